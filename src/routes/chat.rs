// ABOUTME: Chat route handler relaying authenticated chat messages to the conversation orchestrator
// ABOUTME: Exposes POST /chat-message returning the reply and the next continuation token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Chat routes
//!
//! The handler authenticates the caller, then hands the request, the caller's
//! id and the conversation store to the orchestrator. Failures come back as
//! the failing collaborator's error payload.

use super::{json_body, with_request_id};
use crate::chat::{ChatMessageRequest, ChatMessageResponse};
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chat_gateway_core::errors::AppError;
use std::sync::Arc;
use tracing::info;

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat-message", post(Self::handle_chat_message))
            .with_state(resources)
    }

    /// Send one chat message, starting or continuing a conversation
    async fn handle_chat_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<ChatMessageRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::chat_message(&resources, &headers, payload)
            .await
            .map_err(|e| with_request_id(e, &headers))
    }

    async fn chat_message(
        resources: &ServerResources,
        headers: &HeaderMap,
        payload: Result<Json<ChatMessageRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_manager.authenticate(headers)?;
        let request = json_body(payload)?;
        let owner_id = auth.user_id.to_string();

        info!(
            user_id = %auth.user_id,
            continuing = !request.user.is_empty(),
            "Chat message received"
        );

        let response: ChatMessageResponse = resources
            .orchestrator
            .handle_message(
                resources.conversations.as_ref(),
                Some(owner_id.as_str()),
                &request,
            )
            .await?;

        Ok(Json(response).into_response())
    }
}
