//! Notification events published to the external message sink.
//!
//! Events are consumed by other services (push notifications, analytics);
//! the wire shape is `{ "type", "userId", "data", "timestamp" }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Number of characters of a reply carried in a `NEW_MESSAGE` preview.
pub const MESSAGE_PREVIEW_CHARS: usize = 50;

/// Kind of notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewMessage,
    WordSaved,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::NewMessage => write!(f, "NEW_MESSAGE"),
            NotificationKind::WordSaved => write!(f, "WORD_SAVED"),
        }
    }
}

/// Envelope published to the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub user_id: Option<String>,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, user_id: Option<String>, data: serde_json::Value) -> Self {
        Self {
            kind,
            user_id,
            data,
            timestamp: Utc::now(),
        }
    }

    /// A `NEW_MESSAGE` event for a freshly generated speaker reply.
    pub fn new_message(payload: NewMessagePayload) -> Self {
        let user_id = payload.user_id.clone();
        // Serializing a struct of strings cannot fail.
        let data = serde_json::to_value(&payload).unwrap_or(serde_json::Value::Null);
        Self::new(NotificationKind::NewMessage, user_id, data)
    }

    /// A `WORD_SAVED` event for a word added to a user's vocabulary.
    pub fn word_saved(payload: WordSavedPayload) -> Self {
        let user_id = Some(payload.user_id.clone());
        let data = serde_json::to_value(&payload).unwrap_or(serde_json::Value::Null);
        Self::new(NotificationKind::WordSaved, user_id, data)
    }
}

/// Payload of a `WORD_SAVED` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSavedPayload {
    pub user_id: String,
    pub word: String,
    pub language: String,
}

/// Payload of a `NEW_MESSAGE` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub user_id: Option<String>,
    pub speaker_id: String,
    pub speaker_name: String,
    pub message_preview: String,
}

impl NewMessagePayload {
    /// Build a payload, truncating the reply to the preview length
    /// on a character boundary.
    pub fn new(
        user_id: Option<String>,
        speaker_id: impl Into<String>,
        speaker_name: impl Into<String>,
        reply: &str,
    ) -> Self {
        Self {
            user_id,
            speaker_id: speaker_id.into(),
            speaker_name: speaker_name.into(),
            message_preview: reply.chars().take(MESSAGE_PREVIEW_CHARS).collect(),
        }
    }
}
