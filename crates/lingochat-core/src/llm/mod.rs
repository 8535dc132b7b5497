//! Completion provider abstractions for LingoChat.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `RetryPolicy`: Exponential backoff for transient provider failures

pub mod box_provider;
pub mod provider;
pub mod retry;
