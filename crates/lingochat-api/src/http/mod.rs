//! HTTP adapter for LingoChat.
//!
//! A thin axum layer over [`ConversationService`](lingochat_core::chat::service::ConversationService):
//! extract, delegate, serialize. Errors use the `{success, message}` body
//! the mobile client expects.

pub mod error;
pub mod handlers;
pub mod router;
