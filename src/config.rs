//! Configuration module - environment settings read once at startup

use anyhow::{anyhow, Result};
use std::sync::Arc;

/// Environment variable holding the Gemini API credential (required)
pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";

/// Environment variable overriding the model identifier
pub const ENV_MODEL: &str = "CRITIQUE_MODEL";

/// Environment variable overriding the provider base URL
pub const ENV_BASE_URL: &str = "CRITIQUE_BASE_URL";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default provider base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Browser origins allowed to call the API during local development
pub const ALLOWED_ORIGINS: &[&str] = &[
    "http://127.0.0.1:5000",
    "http://localhost:5000",
    "http://127.0.0.1:8000",
    "http://localhost:8000",
];

/// Optional configuration parameters for Config::new()
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Create a new Config with the required API key plus optional settings
    pub fn new(api_key: String, options: ConfigOptions) -> Result<Arc<Self>> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(anyhow!("API key cannot be empty"));
        }

        let model = options
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_string();

        let base_url = options
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Arc::new(Self {
            api_key,
            model,
            base_url,
            request_timeout_secs: options.request_timeout_secs.unwrap_or(30),
        }))
    }

    /// Read configuration from environment variables.
    /// A missing credential is a startup-time fatal condition, not a
    /// per-request error.
    pub fn from_env() -> Result<Arc<Self>> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| anyhow!("{} environment variable is required", ENV_API_KEY))?;

        Self::new(
            api_key,
            ConfigOptions {
                model: std::env::var(ENV_MODEL).ok(),
                base_url: std::env::var(ENV_BASE_URL).ok(),
                request_timeout_secs: None,
            },
        )
    }
}
