// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, in-memory database, config and router helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `chat_gateway`

use anyhow::Result;
use axum::Router;
use chat_gateway::{
    config::{DatabaseUrl, ServerConfig},
    constants::env_config,
    database::{repositories::ConversationRepositoryImpl, Database},
    llm::CompletionClient,
    resources::ServerResources,
    server::build_router,
};
use std::collections::HashMap;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Signing secret used by test configurations
pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory).await
}

/// Conversation store over a fresh in-memory database
pub async fn create_test_repository() -> Result<ConversationRepositoryImpl> {
    Ok(ConversationRepositoryImpl::new(create_test_database().await?))
}

/// Configuration built from explicit variables instead of the process environment
pub fn test_config(overrides: &[(&str, &str)]) -> Result<ServerConfig> {
    let mut vars: HashMap<String, String> = HashMap::from([
        (env_config::SECRET.to_owned(), TEST_SECRET.to_owned()),
        (env_config::DATABASE_URL.to_owned(), "sqlite::memory:".to_owned()),
        (env_config::OPENAI_API_KEY.to_owned(), "sk-test".to_owned()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_owned(), (*value).to_owned());
    }
    ServerConfig::from_vars(|key| vars.get(key).cloned())
}

/// Full resources over an in-memory database and the given completion client
pub async fn create_test_resources(
    completion_client: Arc<dyn CompletionClient>,
) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let config = test_config(&[])?;
    Ok(Arc::new(ServerResources::new(
        database,
        completion_client,
        config,
    )))
}

/// Application router with the production middleware stack
pub async fn create_test_router(completion_client: Arc<dyn CompletionClient>) -> Result<Router> {
    Ok(build_router(create_test_resources(completion_client).await?))
}
