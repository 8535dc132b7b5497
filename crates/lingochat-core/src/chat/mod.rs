//! Conversation orchestration: prompt assembly, response generation,
//! per-session locking, display projections and the service tying them
//! together.

pub mod generator;
pub mod locks;
pub mod prompt;
pub mod service;
pub mod view;
