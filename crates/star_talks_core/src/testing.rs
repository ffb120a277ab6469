//! Scripted `GenerativeService` used by the unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{
    ConversationRequest, GenerativeService, PortError, PortResult, StructuredRequest,
};

type Script = Mutex<VecDeque<Result<String, String>>>;

/// Replays scripted replies in order and records every request it receives.
#[derive(Default)]
pub struct MockGenerator {
    structured_script: Script,
    conversation_script: Script,
    structured_seen: Mutex<Vec<StructuredRequest>>,
    conversation_seen: Mutex<Vec<ConversationRequest>>,
}

impl MockGenerator {
    pub fn structured(replies: Vec<Result<String, String>>) -> Self {
        Self {
            structured_script: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn conversational(replies: Vec<Result<String, String>>) -> Self {
        Self {
            conversation_script: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn structured_requests(&self) -> Vec<StructuredRequest> {
        self.structured_seen.lock().unwrap().clone()
    }

    pub fn conversation_requests(&self) -> Vec<ConversationRequest> {
        self.conversation_seen.lock().unwrap().clone()
    }

    fn next(script: &Script) -> PortResult<String> {
        match script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(PortError::Unexpected(reason)),
            None => Err(PortError::Unexpected("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl GenerativeService for MockGenerator {
    async fn generate_structured(&self, request: &StructuredRequest) -> PortResult<String> {
        self.structured_seen.lock().unwrap().push(request.clone());
        Self::next(&self.structured_script)
    }

    async fn generate_from_conversation(
        &self,
        request: &ConversationRequest,
    ) -> PortResult<String> {
        self.conversation_seen.lock().unwrap().push(request.clone());
        Self::next(&self.conversation_script)
    }
}
