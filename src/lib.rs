//! Tactix: LLM-backed marketing endpoints.

pub mod config;
pub mod error;
pub mod llm;
pub mod marketing;
pub mod origin;
