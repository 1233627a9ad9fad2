//! Chat provider abstraction.
//!
//! - `OllamaChatProvider` talks to a locally hosted Ollama server.
//! - `MockChatProvider` returns scripted replies and records every request.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mindwell_core::config::ChatProviderConfig;
use mindwell_core::types::ChatTurn;

use crate::error::ChatError;
use crate::prompt::ChatRequest;

/// A chat model that turns a message list into one reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the request and return the generated reply text.
    async fn chat(&self, request: &ChatRequest) -> Result<String, ChatError>;

    /// Model identifier, for logs and the health endpoint.
    fn model(&self) -> &str;
}

// ---------------------------------------------------------------------------
// OllamaChatProvider
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

/// Non-streaming client for Ollama's `/api/chat`.
pub struct OllamaChatProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaChatProvider {
    pub fn new(config: &ChatProviderConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ChatProvider for OllamaChatProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages: request.messages(),
            stream: false,
        };

        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        let body_text = resp.text().await?;

        tracing::debug!(status = %status, bytes = body_text.len(), "Ollama responded");

        if !status.is_success() {
            return Err(ChatError::Provider(format!(
                "Ollama HTTP error {}: {}",
                status, body_text
            )));
        }

        let parsed: OllamaChatResponse = serde_json::from_str(&body_text)
            .map_err(|e| ChatError::Provider(format!("invalid Ollama response: {}", e)))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| ChatError::Provider("Ollama response has no message".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// MockChatProvider
// ---------------------------------------------------------------------------

/// Scripted provider for tests and offline development.
///
/// Queued outcomes are consumed first; once the queue is empty every call
/// returns `default_reply`.
pub struct MockChatProvider {
    default_reply: String,
    queued: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatProvider {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            default_reply: default_reply.into(),
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply for the next call.
    pub fn push_reply(&self, reply: impl Into<String>) {
        if let Ok(mut q) = self.queued.lock() {
            q.push_back(Ok(reply.into()));
        }
    }

    /// Queue a failure for the next call.
    pub fn push_failure(&self, message: impl Into<String>) {
        if let Ok(mut q) = self.queued.lock() {
            q.push_back(Err(message.into()));
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new("I'm here for you.")
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ChatError> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(request.clone());
        }
        let next = self.queued.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(msg)) => Err(ChatError::Provider(msg)),
            None => Ok(self.default_reply.clone()),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Tests
// =============================================================================
