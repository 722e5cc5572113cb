// ABOUTME: Conversation continuation protocol between clients, the store and the completion API
// ABOUTME: Request/response types, orchestration phases and the combined chat error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! # Chat Conversations
//!
//! A chat message either starts a conversation (empty `user` token) or
//! continues one. Starting a conversation costs a priming completion call whose
//! upstream id becomes the handle for the real call. Every successful exchange
//! returns the upstream id of the real call, which the client sends back as the
//! next continuation token.

/// Conversation orchestrator
pub mod orchestrator;
/// Prompt assembly helpers
pub mod prompt;

pub use orchestrator::ConversationOrchestrator;

use chat_gateway_core::errors::{AppError, CompletionError, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tokens requested when the client omits `length`
pub const DEFAULT_MAX_TOKENS: u32 = 150;

const fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Inbound chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    /// Seed context for the priming call
    #[serde(default)]
    pub ai_prompt: String,
    /// The user's message
    pub user_prompt: String,
    /// Completion model; empty selects the configured default
    #[serde(default)]
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub length: u32,
    /// Continuation token; empty starts a new conversation
    #[serde(default)]
    pub user: String,
}

/// Outbound chat reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    /// Generated text, trimmed
    pub response: String,
    /// Upstream handle the exchange continued from
    pub previous_conversation_id: String,
    /// Upstream id of this exchange; the next continuation token
    pub conversation_id: String,
}

/// Orchestration phases of one chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    /// Minting an upstream handle and registering the conversation
    NewConversation,
    /// Assembling the prompt and calling the completion API
    ContinuingConversation,
    /// Transcript persisted, reply ready
    Complete,
    /// A collaborator failed; its error is surfaced unchanged
    Failed,
}

impl fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewConversation => "NEW_CONVERSATION",
            Self::ContinuingConversation => "CONTINUING_CONVERSATION",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Failure of a chat exchange, tagged with the collaborator that failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The request itself was unusable
    #[error("invalid chat request: {0}")]
    InvalidRequest(String),
    /// The conversation store failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The completion client failed
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl From<ChatError> for AppError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::InvalidRequest(message) => Self::invalid_input(message),
            ChatError::Store(e) => e.into(),
            ChatError::Completion(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_gateway_core::errors::ErrorCode;

    #[test]
    fn test_request_defaults() {
        let request: ChatMessageRequest =
            serde_json::from_str(r#"{"user_prompt":"hello"}"#).unwrap();
        assert_eq!(request.user_prompt, "hello");
        assert!(request.ai_prompt.is_empty());
        assert!(request.model.is_empty());
        assert!(request.user.is_empty());
        assert_eq!(request.length, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_user_prompt_is_required() {
        assert!(serde_json::from_str::<ChatMessageRequest>(r#"{"ai_prompt":"ctx"}"#).is_err());
    }

    #[test]
    fn test_chat_error_keeps_collaborator() {
        let store: AppError = ChatError::from(StoreError::Conflict { id: "c".into() }).into();
        assert_eq!(store.code, ErrorCode::ResourceAlreadyExists);
        assert_eq!(store.context.details["source"], "store");

        let completion: AppError = ChatError::from(CompletionError::EmptyCompletion).into();
        assert_eq!(completion.context.details["source"], "completion");
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(
            ConversationPhase::ContinuingConversation.to_string(),
            "CONTINUING_CONVERSATION"
        );
    }
}
