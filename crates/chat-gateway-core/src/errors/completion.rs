// ABOUTME: Completion client error type for upstream outages, bad replies and empty results
// ABOUTME: Converts into AppError with the failing collaborator recorded in the details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use super::{AppError, ErrorCode};
use serde_json::json;
use thiserror::Error;

/// Failures reported by the completion client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// Upstream could not be reached (connect failure or timeout)
    #[error("completion API unavailable: {reason}")]
    UpstreamUnavailable {
        /// Transport failure description
        reason: String,
    },
    /// Upstream replied with a non-success status or a body that does not match the schema
    #[error("completion API error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    UpstreamError {
        /// HTTP status, absent when the body was unreadable
        status: Option<u16>,
        /// Error detail from the upstream or the parser
        message: String,
    },
    /// Upstream replied successfully with zero choices
    #[error("completion API returned no choices")]
    EmptyCompletion,
}

impl CompletionError {
    /// Short machine-readable name of the variant
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::UpstreamError { .. } => "upstream_error",
            Self::EmptyCompletion => "empty_completion",
        }
    }

    /// Malformed or schema-violating response body
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::UpstreamError {
            status: None,
            message: format!("malformed response body: {message}"),
        }
    }
}

impl From<CompletionError> for AppError {
    fn from(error: CompletionError) -> Self {
        let code = match &error {
            CompletionError::UpstreamUnavailable { .. } => ErrorCode::ExternalServiceUnavailable,
            CompletionError::UpstreamError { .. } => ErrorCode::ExternalServiceError,
            CompletionError::EmptyCompletion => ErrorCode::ExternalEmptyResponse,
        };

        let mut details = json!({
            "source": "completion",
            "kind": error.kind(),
        });
        if let CompletionError::UpstreamError {
            status: Some(status),
            ..
        } = &error
        {
            details["upstream_status"] = json!(status);
        }

        Self::new(code, error.to_string())
            .with_details(details)
            .with_source(error.clone())
    }
}
