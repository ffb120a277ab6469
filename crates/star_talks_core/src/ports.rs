//! crates/star_talks_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete generative-model vendor.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::domain::ChatMessage;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, SDK).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("The upstream call did not finish within {0:?}")]
    Timeout(Duration),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request Shapes
//=========================================================================================

/// A single-turn request whose reply must be JSON matching `schema`.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub prompt: String,
    /// Name the schema is registered under with the upstream service.
    pub schema_name: String,
    pub schema: Value,
}

/// A multi-turn request: the ordered history plus a system-level instruction.
#[derive(Debug, Clone)]
pub struct ConversationRequest {
    pub system_instruction: String,
    pub contents: Vec<ChatMessage>,
    pub temperature: f32,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Generates JSON-formatted text for a prompt constrained by a response schema.
    /// An empty string means the upstream returned no text body.
    async fn generate_structured(&self, request: &StructuredRequest) -> PortResult<String>;

    /// Generates the next free-text turn of a conversation.
    /// An empty string means the upstream returned no text body.
    async fn generate_from_conversation(&self, request: &ConversationRequest)
        -> PortResult<String>;
}
