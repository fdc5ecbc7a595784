//! Remote chat service interface and its HTTP client.

use crate::error::TourGuideError;
use crate::types::Message;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tourguide_config::BackendConfig;

#[async_trait]
/// Produces the tour guide's next reply given the conversation so far.
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, messages: &[Message]) -> Result<String, TourGuideError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Chat backend speaking JSON over HTTP: `POST {messages}` -> `{reply}`.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpChatBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.chat_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn reply(&self, messages: &[Message]) -> Result<String, TourGuideError> {
        debug!(
            "requesting chat reply (url={}, messages={})",
            self.url,
            messages.len()
        );
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest { messages })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| TourGuideError::Backend(err.to_string()))?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| TourGuideError::Backend(err.to_string()))?;
        Ok(body.reply)
    }
}
