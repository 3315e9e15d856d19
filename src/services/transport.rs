//! Outbound text transport

use std::sync::Mutex;
use tracing::info;

use crate::types::{RelayError, Result};

/// Trait for sending texts (allows swapping the carrier integration)
#[async_trait::async_trait]
pub trait TextSender: Send + Sync {
    /// Deliver `body` to `phone`
    async fn send(&self, phone: &str, body: &str) -> Result<()>;
}

/// Sender that only logs, for development runs
#[derive(Debug, Default, Clone)]
pub struct LogSender;

#[async_trait::async_trait]
impl TextSender for LogSender {
    async fn send(&self, phone: &str, body: &str) -> Result<()> {
        info!(recipient = phone, body, "sending text");
        Ok(())
    }
}

/// A text captured by [`RecordingSender`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub phone: String,
    pub body: String,
}

/// Sender that keeps every text in memory, optionally refusing some phones
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentText>>,
    unreachable: Mutex<Vec<String>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent send to `phone`
    pub fn make_unreachable(&self, phone: impl Into<String>) {
        self.unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(phone.into());
    }

    /// Everything sent so far, in order
    pub fn sent(&self) -> Vec<SentText> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Bodies sent to one phone, in order
    pub fn sent_to(&self, phone: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|t| t.phone == phone)
            .map(|t| t.body)
            .collect()
    }
}

#[async_trait::async_trait]
impl TextSender for RecordingSender {
    async fn send(&self, phone: &str, body: &str) -> Result<()> {
        let unreachable = self
            .unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|p| p == phone);
        if unreachable {
            return Err(RelayError::Transport(format!("{} is unreachable", phone)));
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentText {
                phone: phone.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}
