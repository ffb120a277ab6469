//! crates/star_talks_core/src/error.rs
//!
//! The single failure type surfaced by the orchestration layer.

/// Sentence shown to the user when a chart could not be produced.
pub const CHART_FAILED_MESSAGE: &str = "Failed to calculate birth architecture.";

/// Sentence shown to the user when a conversation turn could not be produced.
pub const COMMUNICATION_INTERRUPTED_MESSAGE: &str =
    "The cosmic connection is interrupted. Please try again.";

/// Errors returned by `ChartRequestBuilder` and `ConversationOrchestrator`.
///
/// The inner string is the detailed cause, meant for logs. Callers showing the
/// failure to a user should use [`OrchestrationError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error("Chart calculation failed: {0}")]
    ChartCalculation(String),
    #[error("Communication interrupted: {0}")]
    CommunicationInterrupted(String),
}

impl OrchestrationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            OrchestrationError::ChartCalculation(_) => CHART_FAILED_MESSAGE,
            OrchestrationError::CommunicationInterrupted(_) => COMMUNICATION_INTERRUPTED_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_detail_but_user_message_does_not() {
        let err = OrchestrationError::ChartCalculation("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "Chart calculation failed: expected value at line 1"
        );
        assert_eq!(err.user_message(), CHART_FAILED_MESSAGE);

        let err = OrchestrationError::CommunicationInterrupted("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
        assert!(!err.user_message().contains("connection reset"));
    }
}
