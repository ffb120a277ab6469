//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.
//!
//! No per-session state lives here. The browser owns the birth details, chart
//! and conversation history, and resends them on every call.

use crate::config::Config;
use star_talks_core::{
    CallPolicy, ChartRequestBuilder, ConversationOrchestrator, GenerativeService, HistoryWindow,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub charts: ChartRequestBuilder,
    pub conversations: ConversationOrchestrator,
}

impl AppState {
    /// Wires both orchestration components to one generative service.
    /// The configuration is only read here; handlers see the components it shaped.
    pub fn new(config: &Config, generator: Arc<dyn GenerativeService>) -> Self {
        let policy: CallPolicy = config.call_policy();
        let window: HistoryWindow = config.history_window();
        Self {
            charts: ChartRequestBuilder::new(generator.clone(), policy),
            conversations: ConversationOrchestrator::new(generator, policy)
                .with_temperature(config.chat_temperature)
                .with_window(window),
        }
    }
}
