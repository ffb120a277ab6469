pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

// Re-export the handlers to make them easily accessible
// to the binary that builds the web server router.
pub use rest::{compute_chart_handler, list_systems_handler, open_conversation_handler, reply_handler};
use state::AppState;

/// Builds the API router. Every route is stateless with respect to the user session.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/systems", get(list_systems_handler))
        .route("/charts", post(compute_chart_handler))
        .route("/conversations/opening", post(open_conversation_handler))
        .route("/conversations/reply", post(reply_handler))
        .with_state(app_state)
}
