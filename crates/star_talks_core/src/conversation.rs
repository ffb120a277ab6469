//! crates/star_talks_core/src/conversation.rs
//!
//! The conversation orchestrator: wraps the caller's running history in a
//! tradition-specific persona and asks the generative service for the next turn.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::domain::{AstrologicalSystem, BirthDetails, ChartData, ChatMessage};
use crate::error::OrchestrationError;
use crate::policy::CallPolicy;
use crate::ports::{ConversationRequest, GenerativeService};

/// Returned in place of an empty reply.
pub const FALLBACK_REPLY: &str = "The stars are momentarily obscured. Please ask again.";

/// Placeholder used in the instruction before a chart has been computed.
pub const NO_CHART_PLACEHOLDER: &str = "No chart generated yet";

/// The guiding tagline every reply keeps in view.
pub const TAGLINE: &str = "Talk to your Ownself";

pub const DEFAULT_TEMPERATURE: f32 = 0.75;

/// The voice the assistant speaks in for each tradition.
pub fn persona(system: AstrologicalSystem) -> &'static str {
    match system {
        AstrologicalSystem::Western => {
            "You are a psychological Western astrologer working with the Tropical zodiac. \
             You read the chart as a map of inner drives, archetypes and growth cycles, \
             and you speak about tendencies rather than fixed fate."
        }
        AstrologicalSystem::Vedic => {
            "You are a Master Vedic Astrologer versed in Jyotisha. You read the Lagna, the Grahas \
             and their Bhavas, and the running Dasha periods to speak about karma, dharma \
             and the timing of life events. Retrograde planets indicate deep internal karmic focus."
        }
        AstrologicalSystem::Chinese => {
            "You are a master of Chinese BaZi, the Four Pillars of Destiny. You read the balance of \
             the Five Elements and the Day Master to speak about harmony, timing of luck cycles \
             and how to move through life with minimum resistance."
        }
        AstrologicalSystem::Hellenistic => {
            "You are a traditional Hellenistic sage. You read Whole Sign houses, planetary dignity \
             and sect with calm, unsentimental honesty about the concrete outcomes of a life."
        }
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    }
}

/// Composes the system-level instruction sent alongside the history.
pub fn build_system_instruction(
    chart: Option<&ChartData>,
    details: &BirthDetails,
    system: AstrologicalSystem,
) -> String {
    let chart_text = match chart {
        Some(chart) => serde_json::to_string(chart)
            .unwrap_or_else(|_| NO_CHART_PLACEHOLDER.to_string()),
        None => NO_CHART_PLACEHOLDER.to_string(),
    };

    format!(
        "{persona}\n\n\
         User Birth Details:\n\
         - Name: {name}\n\
         - Date: {date}\n\
         - Time: {time}\n\
         - Location: {location}\n\n\
         Birth Chart Data ({system}): {chart_text}.\n\n\
         Stay in character as this {title} astrologer in every reply.\n\
         Be specific to the chart's placements instead of giving generic advice \
         (for example: \"With your Jupiter in the 9th house, your path to wisdom is...\").\n\
         Use the tagline \"{TAGLINE}\" as your guiding light.\n\
         Be professional and universal: do not use region-specific greetings like \"Namaste\".\n\
         Always keep the exact birth time and location in view so every answer stays personal.",
        persona = persona(system),
        name = or_unknown(&details.name),
        date = or_unknown(&details.date),
        time = or_unknown(&details.time),
        location = or_unknown(&details.location),
        title = system.title(),
    )
}

/// The first user turn that opens a discussion about a freshly computed chart.
pub fn opening_request(system: AstrologicalSystem) -> ChatMessage {
    ChatMessage::user(format!(
        "Please provide a high-level opening assessment based on my {} profile. \
         I want to know the true structure of my character and what current cycles \
         I should be aware of.",
        system
    ))
}

/// How much of the history is sent upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryWindow {
    /// Every prior turn, in order.
    #[default]
    Full,
    /// Only the most recent `n` turns. The newest turn is always kept, even for `n == 0`.
    Recent(usize),
}

impl HistoryWindow {
    pub fn apply<'h>(&self, history: &'h [ChatMessage]) -> &'h [ChatMessage] {
        match *self {
            HistoryWindow::Full => history,
            HistoryWindow::Recent(n) => &history[history.len().saturating_sub(n.max(1))..],
        }
    }
}

//=========================================================================================
// The Orchestrator
//=========================================================================================

/// Produces the next assistant turn of a conversation.
///
/// The history belongs to the caller; it is read, never modified or retained.
#[derive(Clone)]
pub struct ConversationOrchestrator {
    generator: Arc<dyn GenerativeService>,
    policy: CallPolicy,
    temperature: f32,
    window: HistoryWindow,
}

impl ConversationOrchestrator {
    pub fn new(generator: Arc<dyn GenerativeService>, policy: CallPolicy) -> Self {
        Self {
            generator,
            policy,
            temperature: DEFAULT_TEMPERATURE,
            window: HistoryWindow::Full,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_window(mut self, window: HistoryWindow) -> Self {
        self.window = window;
        self
    }

    /// Builds the request that `continue_conversation` would send.
    pub fn build_request(
        &self,
        history: &[ChatMessage],
        chart: Option<&ChartData>,
        details: &BirthDetails,
        system: AstrologicalSystem,
    ) -> ConversationRequest {
        ConversationRequest {
            system_instruction: build_system_instruction(chart, details, system),
            contents: self.window.apply(history).to_vec(),
            temperature: self.temperature,
        }
    }

    /// Returns the assistant's reply to `history`.
    pub async fn continue_conversation(
        &self,
        history: &[ChatMessage],
        chart: Option<&ChartData>,
        details: &BirthDetails,
        system: AstrologicalSystem,
    ) -> Result<String, OrchestrationError> {
        let start = Instant::now();
        info!(
            "Continuing {} conversation with {} prior turns (chart present: {})",
            system,
            history.len(),
            chart.is_some()
        );

        let request = self.build_request(history, chart, details, system);
        let reply = self
            .policy
            .execute(|| self.generator.generate_from_conversation(&request))
            .await
            .map_err(|e| {
                error!("Conversation turn for {} failed upstream: {}", system, e);
                OrchestrationError::CommunicationInterrupted(e.to_string())
            })?;

        info!("⏱️ {} reply generated in {:?}", system, start.elapsed());

        if reply.trim().is_empty() {
            warn!("Upstream returned an empty reply; substituting the fallback sentence.");
            return Ok(FALLBACK_REPLY.to_string());
        }
        Ok(reply)
    }

    /// Asks for the opening assessment of a chart.
    pub async fn open_conversation(
        &self,
        chart: Option<&ChartData>,
        details: &BirthDetails,
        system: AstrologicalSystem,
    ) -> Result<String, OrchestrationError> {
        let opening = [opening_request(system)];
        self.continue_conversation(&opening, chart, details, system)
            .await
    }
}
