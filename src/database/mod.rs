// ABOUTME: SQLite connection management and schema migrations
// ABOUTME: Owns the sqlx pool shared by user accounts and the conversation store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! # Database Management
//!
//! The gateway keeps three tables: `users`, `conversations` and
//! `conversation_histories`. Tables are created idempotently at startup.

mod conversations;
/// Repository traits over the database
pub mod repositories;
/// RAII transaction guard
pub mod transactions;
mod users;

use crate::config::DatabaseUrl;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Database manager for users and conversations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn new(url: &DatabaseUrl) -> Result<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let connection_string = url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&connection_string)
            .with_context(|| format!("Invalid database URL: {connection_string}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to :memory: is a separate database, so keep exactly one alive
        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {connection_string}"))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_conversations().await?;
        Ok(())
    }
}
