// ABOUTME: Conversation store error type covering conflicts, missing rows and outages
// ABOUTME: Converts into AppError with the failing collaborator recorded in the details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use super::{AppError, ErrorCode};
use serde_json::json;
use thiserror::Error;

/// Failures reported by the conversation store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A conversation with this id already exists
    #[error("conversation {id} already exists")]
    Conflict {
        /// Conflicting conversation id
        id: String,
    },
    /// The referenced conversation or owner does not exist
    #[error("{id} not found")]
    NotFound {
        /// Missing conversation id, owner id or continuation token
        id: String,
    },
    /// The backing database failed transiently; nothing was written
    #[error("conversation store unavailable: {reason}")]
    Unavailable {
        /// Backend failure description
        reason: String,
    },
}

impl StoreError {
    /// Short machine-readable name of the variant
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "unavailable",
        }
    }

    /// Build an `Unavailable` error from any displayable backend failure
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        let (code, resource_id) = match &error {
            StoreError::Conflict { id } => (ErrorCode::ResourceAlreadyExists, Some(id.clone())),
            StoreError::NotFound { id } => (ErrorCode::ResourceNotFound, Some(id.clone())),
            StoreError::Unavailable { .. } => (ErrorCode::ResourceUnavailable, None),
        };

        let app_error = Self::new(code, error.to_string())
            .with_details(json!({
                "source": "store",
                "kind": error.kind(),
            }))
            .with_source(error.clone());

        match resource_id {
            Some(id) => app_error.with_resource_id(id),
            None => app_error,
        }
    }
}
