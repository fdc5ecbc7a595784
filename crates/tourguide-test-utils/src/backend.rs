use async_trait::async_trait;
use parking_lot::Mutex;
use tourguide_core::{ChatBackend, Message, TourGuideError};

/// Backend that always answers with the same reply.
#[derive(Debug, Clone)]
pub struct FixedBackend {
    reply: String,
}

impl FixedBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for FixedBackend {
    async fn reply(&self, _messages: &[Message]) -> Result<String, TourGuideError> {
        Ok(self.reply.clone())
    }
}

/// Backend that always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingBackend;

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn reply(&self, _messages: &[Message]) -> Result<String, TourGuideError> {
        Err(TourGuideError::Backend("backend unavailable".to_string()))
    }
}

/// Backend that records every history it was asked about.
#[derive(Default)]
pub struct RecordingBackend {
    reply: String,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl RecordingBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatBackend for RecordingBackend {
    async fn reply(&self, messages: &[Message]) -> Result<String, TourGuideError> {
        self.requests.lock().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}
