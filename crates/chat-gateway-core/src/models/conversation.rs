// ABOUTME: Conversation and conversation history record types for database persistence
// ABOUTME: A conversation is created once; its history holds the cumulative transcript
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat conversation, created exactly once and never mutated afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Client-generated UUID string
    pub id: String,
    /// First user prompt of the conversation
    pub originating_prompt: String,
    /// User who started the conversation
    pub owner_id: Option<String>,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
}

/// Cumulative transcript of a conversation; at most one per conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    /// Conversation this transcript belongs to
    pub conversation_id: String,
    /// Full transcript, overwritten on every exchange
    pub history: String,
    /// Upstream completion id returned with the latest exchange
    pub upstream_id: Option<String>,
    /// When the transcript was last written
    pub updated_at: DateTime<Utc>,
}
