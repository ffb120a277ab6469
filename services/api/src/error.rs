//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use star_talks_core::OrchestrationError;
use tracing::error;
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a chart or conversation request that could not be fulfilled.
    #[error("Orchestration Error: {0}")]
    Orchestration(#[from] OrchestrationError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// JSON body returned with every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// A sentence suitable for showing to the user as-is.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The detailed cause stays in the logs; the client only gets a displayable sentence.
        error!("Request failed: {}", self);
        let (status, message) = match &self {
            ApiError::Orchestration(e) => (StatusCode::BAD_GATEWAY, e.user_message().to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_talks_core::error::{CHART_FAILED_MESSAGE, COMMUNICATION_INTERRUPTED_MESSAGE};

    #[test]
    fn orchestration_failures_map_to_bad_gateway() {
        let response =
            ApiError::from(OrchestrationError::ChartCalculation("bad json".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::from(OrchestrationError::CommunicationInterrupted("x".to_string()));
        assert!(matches!(err, ApiError::Orchestration(_)));
        assert_ne!(CHART_FAILED_MESSAGE, COMMUNICATION_INTERRUPTED_MESSAGE);
    }

    #[test]
    fn other_failures_map_to_internal_error() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
