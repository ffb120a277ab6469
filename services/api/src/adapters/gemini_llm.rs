//! services/api/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the generative model behind charts and chat.
//! It implements the `GenerativeService` port from the `core` crate by talking to
//! Gemini through its OpenAI-compatible chat completions endpoint.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use star_talks_core::{
    ChatMessage, ChatRole, ConversationRequest, GenerativeService, PortError, PortResult,
    StructuredRequest,
};
use std::sync::LazyLock;
use tracing::debug;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerativeService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client<OpenAIConfig>,
    chart_model: String,
    chat_model: String,
}

impl GeminiAdapter {
    /// Creates a new `GeminiAdapter`.
    pub fn new(client: Client<OpenAIConfig>, chart_model: String, chat_model: String) -> Self {
        Self {
            client,
            chart_model,
            chat_model,
        }
    }

    /// Some models wrap JSON replies in a markdown fence even when asked not to.
    fn strip_code_fence(text: &str) -> String {
        match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
            Some(inner) => inner.as_str().to_string(),
            None => text.to_string(),
        }
    }

    /// Builds the single-turn chart completion with a JSON-schema response format.
    fn structured_completion(
        &self,
        request: &StructuredRequest,
    ) -> PortResult<CreateChatCompletionRequest> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some("A birth chart with positions and commentary.".to_string()),
                name: request.schema_name.clone(),
                schema: Some(request.schema.clone()),
                strict: None,
            },
        };

        CreateChatCompletionRequestArgs::default()
            .model(&self.chart_model)
            .messages(messages)
            .response_format(response_format)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    /// Extracts the text content from the first choice, or an empty string.
    fn first_text(response: CreateChatCompletionResponse) -> String {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

/// Maps the system instruction and role-tagged history onto chat completion messages.
/// `model` turns become `assistant` messages; order is preserved.
pub fn to_request_messages(
    request: &ConversationRequest,
) -> PortResult<Vec<ChatCompletionRequestMessage>> {
    let mut messages = Vec::with_capacity(request.contents.len() + 1);
    messages.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_instruction.as_str())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into(),
    );
    for ChatMessage { role, content } in &request.contents {
        let message: ChatCompletionRequestMessage = match role {
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatRole::Model => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        };
        messages.push(message);
    }
    Ok(messages)
}

//=========================================================================================
// `GenerativeService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerativeService for GeminiAdapter {
    /// Requests JSON constrained by the declared schema.
    async fn generate_structured(&self, request: &StructuredRequest) -> PortResult<String> {
        let completion = self.structured_completion(request)?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(completion)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let text = Self::first_text(response);
        debug!("Structured reply body: {} bytes", text.len());
        Ok(Self::strip_code_fence(&text))
    }

    /// Requests the next turn given the full conversation.
    async fn generate_from_conversation(
        &self,
        request: &ConversationRequest,
    ) -> PortResult<String> {
        let completion = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(to_request_messages(request)?)
            .temperature(request.temperature)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(completion)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        Ok(Self::first_text(response))
    }
}
