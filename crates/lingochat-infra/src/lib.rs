//! Infrastructure layer for LingoChat.
//!
//! Contains implementations of the port traits defined in `lingochat-core`:
//! SQLite storage for speakers, chat sessions and vocabulary, the Gemini completion
//! provider, and the Azure Service Bus notification sink. Also hosts the
//! service configuration loader and the speaker seed catalog.

pub mod config;
pub mod llm;
pub mod notify;
pub mod seed;
pub mod sqlite;
