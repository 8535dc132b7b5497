//! LlmProvider trait definition.
//!
//! This is the core abstraction that the external text-completion service
//! is reached through.

use lingochat_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends (Gemini, test doubles, ...).
///
/// Implementations must report quota/rate exhaustion as
/// `LlmError::ResourceExhausted` so callers can answer with a fallback
/// phrase instead of failing.
///
/// Implementations live in lingochat-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
