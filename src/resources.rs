// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Wires database, auth manager, conversation store and orchestrator together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use crate::auth::AuthManager;
use crate::chat::ConversationOrchestrator;
use crate::config::ServerConfig;
use crate::database::repositories::{ConversationRepository, ConversationRepositoryImpl};
use crate::database::Database;
use crate::llm::CompletionClient;
use std::sync::Arc;

/// Resources shared across request handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Database for user accounts
    pub database: Database,
    /// Token issuing and validation
    pub auth_manager: AuthManager,
    /// Conversation store passed into each chat exchange
    pub conversations: Arc<dyn ConversationRepository>,
    /// Conversation continuation protocol
    pub orchestrator: ConversationOrchestrator,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from an opened database and a completion client
    #[must_use]
    pub fn new(
        database: Database,
        completion_client: Arc<dyn CompletionClient>,
        config: ServerConfig,
    ) -> Self {
        Self {
            auth_manager: AuthManager::new(&config.auth),
            conversations: Arc::new(ConversationRepositoryImpl::new(database.clone())),
            orchestrator: ConversationOrchestrator::new(completion_client),
            database,
            config: Arc::new(config),
        }
    }
}
