// ABOUTME: Main library entry point for the chat gateway
// ABOUTME: Authenticated HTTP backend relaying chat conversations to a text-completion API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

#![deny(unsafe_code)]

//! # Chat Gateway
//!
//! A thin HTTP backend that registers users, issues signed access tokens and
//! relays chat prompts to an upstream text-completion service.
//!
//! ## Architecture
//!
//! - **Conversation store**: durable conversations and their cumulative transcripts
//! - **Completion client**: adapter over the upstream completion endpoint
//! - **Conversation orchestrator**: the start/continue protocol tying the two together
//! - **Routes**: account, chat and health endpoints on Axum
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chat_gateway::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Chat gateway configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// Used by the binary (src/bin/) and integration tests (tests/).

/// Token issuing, validation and password hashing
pub mod auth;

/// Conversation continuation protocol
pub mod chat;

/// Environment configuration and secret generation
pub mod config;

/// `SQLite` persistence for users and conversations
pub mod database;

/// Upstream text-completion clients
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Shared state handed to route handlers
pub mod resources;

/// `HTTP` route groups
pub mod routes;

/// Router assembly and server loop
pub mod server;

/// Error types shared with the core crate
pub use chat_gateway_core::errors;

/// Constants shared with the core crate
pub use chat_gateway_core::constants;

/// Domain models shared with the core crate
pub use chat_gateway_core::models;
