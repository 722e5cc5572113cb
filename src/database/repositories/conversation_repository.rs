// ABOUTME: Conversation repository implementation backed by SQLite
// ABOUTME: Delegates to Database for transactional conversation persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use super::ConversationRepository;
use crate::database::Database;
use async_trait::async_trait;
use chat_gateway_core::errors::StoreError;
use chat_gateway_core::models::{Conversation, ConversationHistory};

/// `SQLite` implementation of `ConversationRepository`
#[derive(Clone)]
pub struct ConversationRepositoryImpl {
    db: Database,
}

impl ConversationRepositoryImpl {
    /// Create a new `ConversationRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationRepository for ConversationRepositoryImpl {
    async fn create_conversation(
        &self,
        id: &str,
        originating_prompt: &str,
        owner_id: Option<&str>,
    ) -> Result<Conversation, StoreError> {
        self.db
            .conversation_create(id, originating_prompt, owner_id)
            .await
    }

    async fn find_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        self.db.conversation_get(id).await
    }

    async fn find_history(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError> {
        self.db.conversation_history_get(conversation_id).await
    }

    async fn find_history_by_upstream_id(
        &self,
        upstream_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError> {
        self.db
            .conversation_history_by_upstream_id(upstream_id)
            .await
    }

    async fn upsert_history(
        &self,
        conversation_id: &str,
        transcript: &str,
        upstream_id: Option<&str>,
    ) -> Result<ConversationHistory, StoreError> {
        self.db
            .conversation_history_upsert(conversation_id, transcript, upstream_id)
            .await
    }
}
