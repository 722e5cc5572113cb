// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-driven server config plus signing secret management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Configuration module for the chat gateway
//!
//! - **Environment**: Server configuration from environment variables
//! - **Secret**: Token signing secret generation for `create-secret`

/// Environment and server configuration
pub mod environment;
/// Signing secret generation and `.env` persistence
pub mod secret;

pub use environment::{
    load_dotenv, AuthConfig, CompletionConfig, DatabaseConfig, DatabaseUrl, ServerConfig,
};
