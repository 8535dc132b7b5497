//! Google Gemini completion provider.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`LlmProvider`](lingochat_core::llm::provider::LlmProvider) trait for the
//! Gemini `generateContent` REST endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
