// ABOUTME: Route module organization for the chat gateway HTTP endpoints
// ABOUTME: Accounts, chat messages and health checks, each exposing a Router builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Route module for the chat gateway
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the auth manager, database or orchestrator.

/// Registration and login routes
pub mod auth;
/// Chat message routes
pub mod chat;
/// Health check routes
pub mod health;

/// Authentication route handlers
pub use auth::AuthRoutes;
/// Chat route handlers
pub use chat::ChatRoutes;
/// Health route handlers
pub use health::HealthRoutes;

use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::Json;
use chat_gateway_core::errors::AppError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id assigned by the server's request-id layer, if any
#[must_use]
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Stamp a handler error with the request id so the error body echoes it
#[must_use]
pub fn with_request_id(error: AppError, headers: &HeaderMap) -> AppError {
    match request_id(headers) {
        Some(id) => error.with_request_id(id),
        None => error,
    }
}

/// Unwrap a JSON body, reporting undecodable payloads as `INVALID_INPUT`
///
/// # Errors
///
/// Returns an invalid-input error carrying the rejection text
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}
