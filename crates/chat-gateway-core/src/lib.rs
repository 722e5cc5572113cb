// ABOUTME: Core types and constants for the chat gateway
// ABOUTME: Foundation crate with error handling, conversation models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

#![deny(unsafe_code)]

//! # Chat Gateway Core
//!
//! Foundation crate providing shared types and constants for the chat gateway.
//! This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the
//!   conversation store / completion client error enums
//! - **constants**: Environment variable names and default values
//! - **models**: Users, conversations and conversation histories

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (User, Conversation, `ConversationHistory`)
pub mod models;
