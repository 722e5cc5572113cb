// ABOUTME: Repository traits over the gateway database
// ABOUTME: ConversationRepository is the conversation store contract used by the chat orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Repository pattern over [`Database`](crate::database::Database)
//!
//! The chat orchestrator only ever sees the [`ConversationRepository`] trait,
//! which lets tests substitute in-memory or failing stores.

/// `SQLite` implementation of the conversation store
pub mod conversation_repository;

pub use conversation_repository::ConversationRepositoryImpl;

use async_trait::async_trait;
use chat_gateway_core::errors::StoreError;
use chat_gateway_core::models::{Conversation, ConversationHistory};

/// Persistence for conversations and their cumulative transcripts
///
/// Mutations are atomic per conversation id and leave nothing behind on failure.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Register a new conversation
    ///
    /// Fails with `Conflict` if `id` already exists and `Unavailable` on backend failure.
    async fn create_conversation(
        &self,
        id: &str,
        originating_prompt: &str,
        owner_id: Option<&str>,
    ) -> Result<Conversation, StoreError>;

    /// Look up a conversation; a missing id is `Ok(None)`
    async fn find_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError>;

    /// Look up the transcript of a conversation; a missing record is `Ok(None)`
    async fn find_history(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError>;

    /// Look up the transcript whose most recent exchange produced `upstream_id`
    async fn find_history_by_upstream_id(
        &self,
        upstream_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError>;

    /// Overwrite the transcript, creating it on first exchange
    ///
    /// Fails with `NotFound` if the conversation does not exist.
    async fn upsert_history(
        &self,
        conversation_id: &str,
        transcript: &str,
        upstream_id: Option<&str>,
    ) -> Result<ConversationHistory, StoreError>;
}
