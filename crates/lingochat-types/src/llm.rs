//! Completion request/response types for LingoChat.
//!
//! These types model the data shapes exchanged with the external
//! text-completion service: requests, responses, usage, and errors.

use serde::{Deserialize, Serialize};

/// Who a prompt turn is attributed to. The conversation history is folded
/// into a single user turn, so only the user role is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

/// A single message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    /// Provider-specific finish reason (e.g. "STOP").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from completion provider operations.
///
/// Resource exhaustion is kept distinct from every other failure: callers
/// answer it with a fallback phrase instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("provider server error: {0}")]
    ServerError(String),

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("resource exhausted (retry after {retry_after_ms:?}ms)")]
    ResourceExhausted { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("completion timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl LlmError {
    /// Quota or rate limit exhausted at the provider.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, LlmError::ResourceExhausted { .. })
    }

    /// Failures worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Network(_) | LlmError::ServerError(_) | LlmError::Overloaded(_)
        )
    }
}
