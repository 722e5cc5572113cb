// ABOUTME: Completion client abstraction for the upstream text-completion API
// ABOUTME: Defines the request/result types and the trait the chat orchestrator calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! # Completion Client
//!
//! A stateless adapter over the upstream completion endpoint. Each call sends
//! one prompt and returns the generated text together with the id the upstream
//! assigned to that call. The client never retries and keeps no state between
//! calls.

/// `OpenAI` engines completion endpoint client
pub mod openai;

pub use openai::OpenAiCompletionClient;

use async_trait::async_trait;
use chat_gateway_core::errors::CompletionError;

/// A single completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Fully assembled prompt text
    pub prompt: String,
    /// Model identifier used in the endpoint path
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Upstream conversation handle sent as `user`; empty for a priming call
    pub upstream_handle: String,
    /// Whether this call may ask the upstream for streaming mode
    pub stream: bool,
}

impl CompletionRequest {
    /// Create a non-streaming request
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        upstream_handle: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens,
            upstream_handle: upstream_handle.into(),
            stream: false,
        }
    }

    /// Mark the request as eligible for streaming mode
    #[must_use]
    pub const fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Generated text plus the upstream id of the call that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// Text of the first choice, untrimmed
    pub text: String,
    /// Upstream-assigned id of this call
    pub upstream_id: String,
}

/// Upstream text-completion API
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform one completion call
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable` when the upstream cannot be reached or times out
    /// - `UpstreamError` on a non-success status or a body missing required fields
    /// - `EmptyCompletion` when the upstream returns zero choices
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResult, CompletionError>;

    /// Model used when a caller does not name one
    fn default_model(&self) -> &str;
}
