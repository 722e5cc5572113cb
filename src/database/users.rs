// ABOUTME: User management database operations
// ABOUTME: Handles user registration and lookup by login id for authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use super::Database;
use chat_gateway_core::errors::{AppError, AppResult};
use chat_gateway_core::models::User;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                login_id TEXT UNIQUE NOT NULL,
                user_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the login id is taken, or a database error
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        let result = sqlx::query(
            r"
            INSERT INTO users (id, login_id, user_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.login_id)
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user.id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::already_exists(format!("User with login id '{}'", user.login_id)),
            ),
            Err(e) => Err(AppError::database(format!("Failed to create user: {e}"))),
        }
    }

    /// Look up a user by login id
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_user_by_login_id(&self, login_id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, login_id, user_name, password_hash, created_at
            FROM users WHERE login_id = $1
            ",
        )
        .bind(login_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let decode = |e: sqlx::Error| AppError::database(format!("Failed to decode user row: {e}"));

    let id: String = row.try_get("id").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::database(format!("Invalid user id '{id}': {e}")))?,
        login_id: row.try_get("login_id").map_err(decode)?,
        user_name: row.try_get("user_name").map_err(decode)?,
        password_hash: row.try_get("password_hash").map_err(decode)?,
        created_at,
    })
}
