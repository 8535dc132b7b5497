//! Shared domain types for LingoChat.
//!
//! This crate contains the domain types used across the conversation service:
//! Speaker, ChatSession, ChatMessage, vocabulary words, notification events,
//! completion request/response shapes, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, uuid.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod notification;
pub mod speaker;
pub mod translation;
pub mod vocabulary;
