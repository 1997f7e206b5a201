//! LLM integration for Tactix.
//!
//! [`LlmProvider`] and [`ImageProvider`] are the seams the marketing workflows
//! depend on. [`OpenAiClient`] implements both over plain HTTP against an
//! OpenAI-compatible API; tests substitute stubs.

pub mod openai;
pub mod provider;

pub use openai::OpenAiClient;
pub use provider::*;

/// Sampling settings for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Sampling {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}
