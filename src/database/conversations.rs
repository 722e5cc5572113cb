// ABOUTME: Conversation store queries for conversations and their cumulative transcripts
// ABOUTME: Every mutation runs in a guarded transaction and maps sqlx failures to StoreError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use super::transactions::TransactionGuard;
use super::Database;
use chat_gateway_core::errors::StoreError;
use chat_gateway_core::models::{Conversation, ConversationHistory};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

impl Database {
    /// Create conversation tables and indexes
    pub(super) async fn migrate_conversations(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                originating_prompt TEXT NOT NULL,
                owner_id TEXT REFERENCES users(id) ON DELETE SET NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS conversation_histories (
                conversation_id TEXT PRIMARY KEY REFERENCES conversations(id) ON DELETE CASCADE,
                history TEXT NOT NULL,
                upstream_id TEXT,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversations_owner ON conversations(owner_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversation_histories_upstream ON conversation_histories(upstream_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a conversation; fails with `Conflict` if the id exists
    pub(crate) async fn conversation_create(
        &self,
        id: &str,
        originating_prompt: &str,
        owner_id: Option<&str>,
    ) -> Result<Conversation, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::unavailable)?;
        let mut guard = TransactionGuard::new(tx);

        // The primary key and owner foreign key decide Conflict/NotFound in the write itself
        let created_at = Utc::now();
        sqlx::query(
            r"
            INSERT INTO conversations (id, originating_prompt, owner_id, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id)
        .bind(originating_prompt)
        .bind(owner_id)
        .bind(created_at)
        .execute(guard.executor()?)
        .await
        .map_err(|e| map_write_error(e, id, owner_id.unwrap_or(id)))?;

        guard.commit().await?;
        debug!(conversation_id = %id, "Conversation created");

        Ok(Conversation {
            id: id.to_owned(),
            originating_prompt: originating_prompt.to_owned(),
            owner_id: owner_id.map(str::to_owned),
            created_at,
        })
    }

    /// Fetch a conversation by id
    pub(crate) async fn conversation_get(
        &self,
        id: &str,
    ) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, originating_prompt, owner_id, created_at
            FROM conversations WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    /// Fetch the transcript of a conversation
    pub(crate) async fn conversation_history_get(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT conversation_id, history, upstream_id, updated_at
            FROM conversation_histories WHERE conversation_id = $1
            ",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        row.as_ref().map(row_to_history).transpose()
    }

    /// Fetch the transcript whose latest exchange returned `upstream_id`
    pub(crate) async fn conversation_history_by_upstream_id(
        &self,
        upstream_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT conversation_id, history, upstream_id, updated_at
            FROM conversation_histories WHERE upstream_id = $1
            ORDER BY updated_at DESC
            LIMIT 1
            ",
        )
        .bind(upstream_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        row.as_ref().map(row_to_history).transpose()
    }

    /// Create or overwrite the transcript; fails with `NotFound` if the conversation is missing
    pub(crate) async fn conversation_history_upsert(
        &self,
        conversation_id: &str,
        history: &str,
        upstream_id: Option<&str>,
    ) -> Result<ConversationHistory, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::unavailable)?;
        let mut guard = TransactionGuard::new(tx);

        let updated_at = Utc::now();
        sqlx::query(
            r"
            INSERT INTO conversation_histories (conversation_id, history, upstream_id, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(conversation_id) DO UPDATE SET
                history = excluded.history,
                upstream_id = excluded.upstream_id,
                updated_at = excluded.updated_at
            ",
        )
        .bind(conversation_id)
        .bind(history)
        .bind(upstream_id)
        .bind(updated_at)
        .execute(guard.executor()?)
        .await
        .map_err(|e| map_write_error(e, conversation_id, conversation_id))?;

        guard.commit().await?;
        debug!(conversation_id = %conversation_id, "Conversation history written");

        Ok(ConversationHistory {
            conversation_id: conversation_id.to_owned(),
            history: history.to_owned(),
            upstream_id: upstream_id.map(str::to_owned),
            updated_at,
        })
    }
}

/// Constraint violations are contract errors; everything else is a backend outage
///
/// `referenced_id` names the parent row a foreign-key violation points at.
fn map_write_error(error: sqlx::Error, id: &str, referenced_id: &str) -> StoreError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict {
            id: id.to_owned(),
        },
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::NotFound {
                id: referenced_id.to_owned(),
            }
        }
        _ => StoreError::unavailable(error),
    }
}

fn row_to_conversation(row: &SqliteRow) -> Result<Conversation, StoreError> {
    Ok(Conversation {
        id: row.try_get("id").map_err(StoreError::unavailable)?,
        originating_prompt: row
            .try_get("originating_prompt")
            .map_err(StoreError::unavailable)?,
        owner_id: row.try_get("owner_id").map_err(StoreError::unavailable)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(StoreError::unavailable)?,
    })
}

fn row_to_history(row: &SqliteRow) -> Result<ConversationHistory, StoreError> {
    Ok(ConversationHistory {
        conversation_id: row
            .try_get("conversation_id")
            .map_err(StoreError::unavailable)?,
        history: row.try_get("history").map_err(StoreError::unavailable)?,
        upstream_id: row.try_get("upstream_id").map_err(StoreError::unavailable)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(StoreError::unavailable)?,
    })
}
