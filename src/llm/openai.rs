// ABOUTME: Completion client for the OpenAI engines completion endpoint
// ABOUTME: Sends prompt payloads with bearer auth and parses replies into a typed schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! # `OpenAI` Completion Client
//!
//! Posts to `{base_url}/engines/{model}/completions`. The body always carries
//! `prompt`, `temperature`, `max_tokens`, `stop`, `n`, `logprobs`, `echo` and
//! `user`, the last being the upstream conversation handle.

use super::{CompletionClient, CompletionRequest, CompletionResult};
use crate::config::CompletionConfig;
use async_trait::async_trait;
use chat_gateway_core::errors::{AppError, CompletionError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Outbound request body
#[derive(Debug, Serialize)]
struct CompletionPayload<'a> {
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    stop: Option<&'a str>,
    n: u32,
    logprobs: Option<u32>,
    echo: bool,
    user: &'a str,
}

/// Successful reply; `id` and `choices` are required
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    id: String,
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the engines completion endpoint
pub struct OpenAiCompletionClient {
    config: CompletionConfig,
    client: Client,
}

impl OpenAiCompletionClient {
    /// Create a client from injected configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: CompletionConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Build the completion URL for a model
    fn api_url(&self, model: &str) -> String {
        format!(
            "{}/engines/{}/completions",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Translate a non-success reply, preferring the upstream's own message
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> CompletionError {
        let message = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |envelope| envelope.error.message,
        );

        CompletionError::UpstreamError {
            status: Some(status.as_u16()),
            message,
        }
    }

    /// Transport failures before a status line arrives
    fn map_send_error(&self, e: &reqwest::Error) -> CompletionError {
        error!("Failed to send completion request: {}", e);
        let reason = if e.is_timeout() {
            format!(
                "request timed out after {}s",
                self.config.request_timeout_secs
            )
        } else if e.is_connect() {
            format!("cannot connect to {}", self.config.base_url)
        } else {
            e.to_string()
        };
        CompletionError::UpstreamUnavailable { reason }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    #[instrument(skip(self, request), fields(model = %request.model, priming = request.upstream_handle.is_empty()))]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResult, CompletionError> {
        let payload = CompletionPayload {
            prompt: &request.prompt,
            temperature: self.config.temperature,
            max_tokens: request.max_tokens,
            stop: None,
            n: 1,
            logprobs: None,
            echo: false,
            user: &request.upstream_handle,
        };

        let mut http_request = self
            .client
            .post(self.api_url(&request.model))
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&payload);

        if request.stream && self.config.stream_query_param {
            http_request = http_request.query(&[("stream", "true")]);
        }

        debug!(
            prompt_len = request.prompt.len(),
            max_tokens = request.max_tokens,
            "Sending completion request"
        );

        let response = http_request
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read completion response: {}", e);
            if e.is_timeout() {
                CompletionError::UpstreamUnavailable {
                    reason: format!("timed out reading response: {e}"),
                }
            } else {
                CompletionError::UpstreamError {
                    status: Some(status.as_u16()),
                    message: format!("failed to read response: {e}"),
                }
            }
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse completion response: {}", e);
            CompletionError::malformed(e)
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyCompletion)?;

        debug!(
            upstream_id = %parsed.id,
            text_len = choice.text.len(),
            finish_reason = ?choice.finish_reason,
            total_tokens = parsed.usage.map(|u| u.total_tokens),
            "Received completion"
        );

        Ok(CompletionResult {
            text: choice.text,
            upstream_id: parsed.id,
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
