// ABOUTME: Scripted completion client and fault-injecting conversation store for tests
// ABOUTME: Records every call so tests can assert on prompts, handles and store writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

use async_trait::async_trait;
use chat_gateway::database::repositories::ConversationRepository;
use chat_gateway::errors::{CompletionError, StoreError};
use chat_gateway::llm::{CompletionClient, CompletionRequest, CompletionResult};
use chat_gateway::models::{Conversation, ConversationHistory};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Completion client that replays queued results in order
pub struct ScriptedCompletionClient {
    results: Mutex<VecDeque<Result<CompletionResult, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    default_model: String,
}

impl ScriptedCompletionClient {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_model: "davinci".to_owned(),
        }
    }

    /// Queue a successful completion
    pub fn reply(self, text: &str, upstream_id: &str) -> Self {
        self.results.lock().unwrap().push_back(Ok(CompletionResult {
            text: text.to_owned(),
            upstream_id: upstream_id.to_owned(),
        }));
        self
    }

    /// Queue a failed completion
    pub fn fail(self, error: CompletionError) -> Self {
        self.results.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResult, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected completion call: {request:?}"))
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    Create,
    Upsert,
}

/// Wraps a real repository, failing selected writes and counting the ones that succeed
pub struct FaultyStore<R> {
    inner: R,
    fault: Option<(StoreFault, StoreError)>,
    writes: Mutex<Vec<StoreFault>>,
}

impl<R: ConversationRepository> FaultyStore<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            fault: None,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, op: StoreFault, error: StoreError) -> Self {
        self.fault = Some((op, error));
        self
    }

    /// Writes that reached the inner store
    pub fn writes(&self) -> Vec<StoreFault> {
        self.writes.lock().unwrap().clone()
    }

    fn check(&self, op: StoreFault) -> Result<(), StoreError> {
        match &self.fault {
            Some((fault, error)) if *fault == op => Err(error.clone()),
            _ => {
                self.writes.lock().unwrap().push(op);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<R: ConversationRepository> ConversationRepository for FaultyStore<R> {
    async fn create_conversation(
        &self,
        id: &str,
        originating_prompt: &str,
        owner_id: Option<&str>,
    ) -> Result<Conversation, StoreError> {
        self.check(StoreFault::Create)?;
        self.inner
            .create_conversation(id, originating_prompt, owner_id)
            .await
    }

    async fn find_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        self.inner.find_conversation(id).await
    }

    async fn find_history(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError> {
        self.inner.find_history(conversation_id).await
    }

    async fn find_history_by_upstream_id(
        &self,
        upstream_id: &str,
    ) -> Result<Option<ConversationHistory>, StoreError> {
        self.inner.find_history_by_upstream_id(upstream_id).await
    }

    async fn upsert_history(
        &self,
        conversation_id: &str,
        transcript: &str,
        upstream_id: Option<&str>,
    ) -> Result<ConversationHistory, StoreError> {
        self.check(StoreFault::Upsert)?;
        self.inner
            .upsert_history(conversation_id, transcript, upstream_id)
            .await
    }
}
