//! Conversation orchestration and port trait definitions for LingoChat.
//!
//! This crate defines the "ports" (repository, completion provider and
//! notification sink traits) that the infrastructure layer implements, plus
//! the conversation and vocabulary services that drive them. It depends only on
//! `lingochat-types` -- never on `lingochat-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod notify;
pub mod repository;
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod testing;
