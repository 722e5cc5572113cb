// ABOUTME: Core data models shared across the gateway
// ABOUTME: Re-exports user and conversation records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

/// Conversation and conversation history records
pub mod conversation;
/// User account records
pub mod user;

pub use conversation::{Conversation, ConversationHistory};
pub use user::{User, UserProfile};
