// ABOUTME: Account route handlers for user registration and login
// ABOUTME: Hashes passwords with bcrypt and issues bearer tokens plus a session cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Authentication routes

use super::{json_body, with_request_id};
use crate::auth::{hash_password, verify_password};
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chat_gateway_core::errors::AppError;
use chat_gateway_core::models::{User, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Incorrect login id or password";

/// Registration payload
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Unique login name
    pub login_id: String,
    /// Plain-text password, hashed before storage
    pub password: String,
    /// Display name
    pub user_name: String,
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub login_id: String,
    /// Plain-text password
    pub password: String,
}

/// Issued access token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let token_url = resources.config.auth.token_url.clone();
        Router::new()
            .route("/create_user", post(Self::handle_create_user))
            .route(&token_url, post(Self::handle_login))
            .with_state(resources)
    }

    /// Register a new user
    async fn handle_create_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<CreateUserRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::create_user(&resources, payload)
            .await
            .map_err(|e| with_request_id(e, &headers))
    }

    async fn create_user(
        resources: &ServerResources,
        payload: Result<Json<CreateUserRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;
        let login_id = request.login_id.trim();
        if login_id.is_empty() {
            return Err(AppError::missing_field("login_id"));
        }
        if request.password.is_empty() {
            return Err(AppError::missing_field("password"));
        }

        let password_hash = hash_password(request.password).await?;
        let user = User::new(
            login_id.to_owned(),
            request.user_name.trim().to_owned(),
            password_hash,
        );

        resources.database.create_user(&user).await?;
        info!(user_id = %user.id, login_id = %user.login_id, "User created");

        Ok((StatusCode::CREATED, Json(UserProfile::from(&user))).into_response())
    }

    /// Exchange credentials for an access token
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::login(&resources, payload)
            .await
            .map_err(|e| with_request_id(e, &headers))
    }

    async fn login(
        resources: &ServerResources,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;
        let Some(user) = resources
            .database
            .get_user_by_login_id(request.login_id.trim())
            .await?
        else {
            AppLogger::log_auth_event(&request.login_id, "login", false, Some("unknown user"));
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        };

        let is_valid = verify_password(request.password, user.password_hash.clone()).await?;
        if !is_valid {
            warn!(login_id = %user.login_id, "Invalid password");
            AppLogger::log_auth_event(&user.login_id, "login", false, Some("bad password"));
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        }

        let access_token = resources.auth_manager.generate_token(&user)?;
        let cookie = resources.auth_manager.session_cookie(&access_token)?;
        AppLogger::log_auth_event(&user.login_id, "login", true, None);

        Ok((
            [(header::SET_COOKIE, cookie)],
            Json(TokenResponse {
                access_token,
                token_type: "bearer".to_owned(),
            }),
        )
            .into_response())
    }
}
