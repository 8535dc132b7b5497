//! Completion provider implementations.

pub mod gemini;
