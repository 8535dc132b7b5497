//! Chat session, message, and conversation projection types for LingoChat.
//!
//! A session is an ordered conversation thread between one user and one
//! speaker. Messages are append-only and carry a per-session sequence id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Prefix of conversation ids created by clients (`chat_<speaker id>`).
pub const SESSION_ID_PREFIX: &str = "chat_";

/// Derive the speaker id a session id refers to.
///
/// Ids without the `chat_` prefix are taken verbatim.
///
/// ```
/// use lingochat_types::chat::speaker_id_from_session_id;
///
/// assert_eq!(speaker_id_from_session_id("chat_aurora-001"), "aurora-001");
/// assert_eq!(speaker_id_from_session_id("hans-002"), "hans-002");
/// ```
pub fn speaker_id_from_session_id(session_id: &str) -> &str {
    session_id
        .strip_prefix(SESSION_ID_PREFIX)
        .unwrap_or(session_id)
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Speaker,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Speaker => write!(f, "speaker"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "speaker" => Ok(Sender::Speaker),
            other => Err(format!("invalid message sender: '{other}'")),
        }
    }
}

/// A chat session between a user and a speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    /// Owning user; anonymous callers leave this empty.
    pub user_id: Option<String>,
    pub speaker_id: String,
    /// Chronological message log. Ids run 1..=len without gaps.
    pub messages: Vec<ChatMessage>,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// A fresh session with an empty log, not yet persisted.
    pub fn new(id: String, user_id: Option<String>, speaker_id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            speaker_id,
            messages: Vec::new(),
            last_activity_at: now,
            created_at: now,
        }
    }

    /// Sequence id the next appended message will receive.
    pub fn next_message_id(&self) -> u32 {
        self.messages.last().map_or(0, |m| m.id) + 1
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// A single message within a chat session. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sequence number within the owning session, starting at 1.
    pub id: u32,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A message about to be appended. The store assigns the sequence id.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Also move the session's `last_activity_at` to `timestamp`.
    pub touch_activity: bool,
}

impl MessageDraft {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            touch_activity: false,
        }
    }

    pub fn speaker(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Speaker,
            text: text.into(),
            timestamp: Utc::now(),
            touch_activity: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Projections returned to callers
// ---------------------------------------------------------------------------

/// Echo of the inbound request, returned alongside the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEcho {
    pub received_at_utc: DateTime<Utc>,
    pub session_id: String,
    pub your_message: String,
}

/// Result of a successful inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageOutcome {
    pub echo: MessageEcho,
    pub assistant_reply: ChatMessage,
}

/// Display projection of a speaker inside a session view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerProfile {
    pub name: String,
    pub description: String,
    pub avatar_seed: String,
    pub flag_url: String,
    pub personality: Vec<String>,
    pub interests: Vec<String>,
}

/// A session with its speaker, as shown when a chat is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub speaker: SpeakerProfile,
    pub messages: Vec<ChatMessage>,
}

/// One row of the "recent chats" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentChat {
    pub speaker_id: String,
    pub chat_id: String,
    pub name: String,
    pub last_message: String,
    /// Coarse relative time of the last activity ("5m ago").
    pub timestamp: String,
    pub unread: bool,
    pub color: String,
    pub avatar_seed: String,
    pub flag_emoji: String,
}
