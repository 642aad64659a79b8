//! Client for the chat-completion worker.
//!
//! The worker takes `{message, history}` and answers `{message}`. Prompting
//! and model choice live on the worker side.

use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::models::ChatMessage;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Sends `message` with the recent transcript and returns the reply text.
    async fn reply(&self, message: &str, history: &[ChatMessage]) -> Result<String, AiError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    message: String,
}

#[derive(Clone)]
pub struct HttpChatClient {
    client: Client,
    endpoint: String,
}

impl HttpChatClient {
    /// `timeout` of `None` keeps the transport default.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, AiError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.to_string(),
        })
    }
}

/// HTTP client shared by both AI endpoints.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, AiError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| {
        warn!("Failed to build HTTP client: {e}");
        AiError::ClientSetup(e.to_string())
    })
}

#[async_trait]
impl ChatPort for HttpChatClient {
    async fn reply(&self, message: &str, history: &[ChatMessage]) -> Result<String, AiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message, history })
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AiError::RequestFailed(format!(
                "chat worker answered {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        Ok(body.message)
    }
}
