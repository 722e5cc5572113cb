// ABOUTME: Conversation orchestrator deciding between new and continued conversations
// ABOUTME: Sequences priming call, store registration, real completion call and history upsert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use super::prompt::{append_user_turn, cumulative_transcript, opening_prompt, priming_prompt};
use super::{ChatError, ChatMessageRequest, ChatMessageResponse, ConversationPhase};
use crate::database::repositories::ConversationRepository;
use crate::llm::{CompletionClient, CompletionRequest};
use crate::logging::AppLogger;
use chat_gateway_core::errors::StoreError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Where the real completion call starts from
struct ExchangeStart {
    conversation_id: String,
    previous_prompt: String,
    upstream_handle: String,
}

/// Runs one chat message through the continuation protocol
///
/// Holds only the completion client; the conversation store is supplied per
/// call so each request owns its own store interactions.
#[derive(Clone)]
pub struct ConversationOrchestrator {
    client: Arc<dyn CompletionClient>,
}

impl ConversationOrchestrator {
    /// Create an orchestrator around a completion client
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Handle one chat message
    ///
    /// Calls are strictly sequential: priming call (new conversations only),
    /// conversation registration, real completion call, history upsert. The
    /// first failure ends the exchange and is returned unchanged; nothing is
    /// retried.
    ///
    /// # Errors
    ///
    /// - `ChatError::InvalidRequest` for an empty prompt or zero length
    /// - `ChatError::Store` when the store rejects or cannot serve a step
    /// - `ChatError::Completion` when either completion call fails
    #[instrument(skip_all, fields(new_conversation = request.user.is_empty()))]
    pub async fn handle_message(
        &self,
        store: &dyn ConversationRepository,
        owner_id: Option<&str>,
        request: &ChatMessageRequest,
    ) -> Result<ChatMessageResponse, ChatError> {
        Self::validate(request)?;

        let started = Instant::now();
        let model = if request.model.trim().is_empty() {
            self.client.default_model().to_owned()
        } else {
            request.model.clone()
        };
        let new_conversation = request.user.is_empty();

        let result = self
            .run_exchange(store, owner_id, request, &model, new_conversation)
            .await;

        match &result {
            Ok(response) => {
                debug!(phase = %ConversationPhase::Complete, "Chat exchange finished");
                AppLogger::log_chat_exchange(
                    &response.conversation_id,
                    new_conversation,
                    response.response.len(),
                    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                );
            }
            Err(e) => {
                warn!(phase = %ConversationPhase::Failed, error = %e, "Chat exchange failed");
            }
        }

        result
    }

    async fn run_exchange(
        &self,
        store: &dyn ConversationRepository,
        owner_id: Option<&str>,
        request: &ChatMessageRequest,
        model: &str,
        new_conversation: bool,
    ) -> Result<ChatMessageResponse, ChatError> {
        let start = if new_conversation {
            self.start_conversation(store, owner_id, request, model)
                .await?
        } else {
            Self::resume_conversation(store, owner_id, &request.user).await?
        };

        debug!(
            phase = %ConversationPhase::ContinuingConversation,
            conversation_id = %start.conversation_id,
            "Assembling prompt"
        );
        let assembled = append_user_turn(&start.previous_prompt, &request.user_prompt);

        let completion = self
            .client
            .complete(
                &CompletionRequest::new(
                    assembled.as_str(),
                    model,
                    request.length,
                    start.upstream_handle.as_str(),
                )
                .with_stream(true),
            )
            .await?;

        let response_text = completion.text.trim().to_owned();
        let transcript = cumulative_transcript(&assembled, &response_text);

        store
            .upsert_history(
                &start.conversation_id,
                &transcript,
                Some(&completion.upstream_id),
            )
            .await?;

        Ok(ChatMessageResponse {
            response: response_text,
            previous_conversation_id: start.upstream_handle,
            conversation_id: completion.upstream_id,
        })
    }

    /// Mint an upstream handle and register a fresh conversation
    async fn start_conversation(
        &self,
        store: &dyn ConversationRepository,
        owner_id: Option<&str>,
        request: &ChatMessageRequest,
        model: &str,
    ) -> Result<ExchangeStart, ChatError> {
        let conversation_id = Uuid::new_v4().to_string();
        debug!(
            phase = %ConversationPhase::NewConversation,
            conversation_id = %conversation_id,
            "Starting conversation"
        );

        let priming = self
            .client
            .complete(&CompletionRequest::new(
                priming_prompt(&request.ai_prompt, &request.user_prompt),
                model,
                request.length,
                "",
            ))
            .await?;

        store
            .create_conversation(&conversation_id, &request.user_prompt, owner_id)
            .await?;

        Ok(ExchangeStart {
            conversation_id,
            previous_prompt: opening_prompt(&request.user_prompt),
            upstream_handle: priming.upstream_id,
        })
    }

    /// Resolve a continuation token to its conversation and transcript
    async fn resume_conversation(
        store: &dyn ConversationRepository,
        owner_id: Option<&str>,
        token: &str,
    ) -> Result<ExchangeStart, ChatError> {
        let not_found = || StoreError::NotFound {
            id: token.to_owned(),
        };

        let history = store
            .find_history_by_upstream_id(token)
            .await?
            .ok_or_else(not_found)?;

        let conversation = store
            .find_conversation(&history.conversation_id)
            .await?
            .ok_or_else(not_found)?;

        // Conversations belonging to someone else are indistinguishable from missing ones
        if let Some(owner) = conversation.owner_id.as_deref() {
            if owner_id != Some(owner) {
                return Err(not_found().into());
            }
        }

        Ok(ExchangeStart {
            conversation_id: conversation.id,
            previous_prompt: history.history,
            upstream_handle: token.to_owned(),
        })
    }

    fn validate(request: &ChatMessageRequest) -> Result<(), ChatError> {
        if request.user_prompt.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "user_prompt must not be empty".to_owned(),
            ));
        }
        if request.length == 0 {
            return Err(ChatError::InvalidRequest(
                "length must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}
