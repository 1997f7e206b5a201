//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::origin::OriginPolicy;

/// Default chat-completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default image-generation model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Default API base URL (chat completions and image generations live under it).
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://nhniqkmyliwfqtowivsq.lovableproject.com",
    "http://localhost:5173",
    "http://localhost:3000",
];

pub const DEFAULT_ALLOWED_ORIGIN_SUFFIXES: &[&str] = &[".lovableproject.com", ".lovable.app"];

/// Service configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bearer credential for the completion and image APIs.
    /// `None` when unset; completions then fail with a configuration error.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub image_model: String,
    /// Whether create-post attempts image generation at all.
    pub images_enabled: bool,
    pub port: u16,
    pub origins: OriginPolicy,
    /// Directory for a daily rolling log file, in addition to stderr.
    pub log_dir: Option<String>,
}

impl ServiceConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_empty("OPENAI_API_KEY").map(SecretString::from);

        let base_url = non_empty("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = non_empty("TACTIX_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let image_model =
            non_empty("TACTIX_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

        let images_enabled = match non_empty("TACTIX_IMAGES_ENABLED") {
            None => true,
            Some(v) => parse_bool("TACTIX_IMAGES_ENABLED", &v)?,
        };

        let port = match non_empty("TACTIX_PORT") {
            None => DEFAULT_PORT,
            Some(v) => v.parse().map_err(|e| ConfigError::InvalidValue {
                key: "TACTIX_PORT".to_string(),
                message: format!("{v:?}: {e}"),
            })?,
        };

        let exact = non_empty("TACTIX_ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect());
        let suffixes = non_empty("TACTIX_ALLOWED_ORIGIN_SUFFIXES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_ORIGIN_SUFFIXES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        Ok(Self {
            api_key,
            base_url,
            model,
            image_model,
            images_enabled,
            port,
            origins: OriginPolicy::new(exact, suffixes),
            log_dir: non_empty("TACTIX_LOG_DIR"),
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {value:?}"),
        }),
    }
}
