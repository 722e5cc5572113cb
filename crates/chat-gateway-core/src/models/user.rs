// ABOUTME: User account record types
// ABOUTME: Stored user with password hash plus the public profile returned by the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Unique login name
    pub login_id: String,
    /// Display name
    pub user_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID
    #[must_use]
    pub fn new(login_id: String, user_name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            login_id,
            user_name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// User fields safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user ID
    pub id: String,
    /// Unique login name
    pub login_id: String,
    /// Display name
    pub user_name: String,
    /// Account creation timestamp (RFC 3339)
    pub created_at: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            login_id: user.login_id.clone(),
            user_name: user.user_name.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
