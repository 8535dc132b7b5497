//! Route handlers grouped by resource.

pub mod chat;
pub mod health;
pub mod translate;
pub mod vocabulary;
