//! Error types for Tactix.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Completion / image API errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No credential in the service configuration; raised before any I/O.
    #[error("OpenAI API key not configured")]
    NotConfigured,

    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    /// Non-2xx from the upstream API. The body is kept for logging only.
    #[error("Provider {provider} API error: {status}")]
    Upstream {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// The model's output could not be turned into the expected structure.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse AI response: no JSON {expected} found")]
    NoJson { expected: &'static str },

    #[error("Failed to parse AI response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Failed to parse AI response: expected {expected} ideas, found {found}")]
    TooFewIdeas { expected: usize, found: usize },
}

/// Errors surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Origin not allowed")]
    OriginRejected { origin: Option<String> },

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::OriginRejected { .. } => StatusCode::FORBIDDEN,
            Self::Llm(_) | Self::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Validation(reason) => {
                tracing::info!(reason = %reason, "Rejected invalid request");
            }
            Self::OriginRejected { origin } => {
                tracing::info!(origin = ?origin, "Rejected request from unauthorized origin");
            }
            Self::Llm(LlmError::Upstream {
                provider,
                status,
                body,
            }) => {
                tracing::error!(provider = %provider, status = status, body = %body, "Upstream API error");
            }
            other => tracing::error!(error = %other, "Request failed"),
        }
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Result type alias for handler-level operations.
pub type Result<T> = std::result::Result<T, ApiError>;
