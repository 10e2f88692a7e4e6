//! API client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SERENITY_API_BASE_URL` - Base URL of the spa API (e.g., `https://api.example.com/api`)
//! - `SERENITY_IMAGE_BASE_URL` - Base URL that relative image paths are resolved against
//!
//! ## Optional
//! - `SERENITY_MIN_LOADING_MS` - Minimum time a resource stays in `loading` (default: 1000)
//! - `SERENITY_TOKEN_FILE` - Where the bearer token is persisted (default: `.serenity/session.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default minimum visible-loading duration.
pub const DEFAULT_MIN_LOADING: Duration = Duration::from_millis(1000);

/// Default location of the persisted bearer token.
pub const DEFAULT_TOKEN_FILE: &str = ".serenity/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the spa API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: Url,
    /// Base URL for relative image paths.
    pub image_base_url: Url,
    /// Minimum time a resource is held in `loading`.
    pub min_loading: Duration,
    /// Path of the persisted bearer token.
    pub token_file: PathBuf,
}

impl ApiConfig {
    /// Build a configuration with defaults for the optional settings.
    #[must_use]
    pub fn new(base_url: Url, image_base_url: Url) -> Self {
        Self {
            base_url,
            image_base_url,
            min_loading: DEFAULT_MIN_LOADING,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        }
    }

    /// Same configuration without the minimum loading delay.
    #[must_use]
    pub fn without_loading_delay(mut self) -> Self {
        self.min_loading = Duration::ZERO;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_url("SERENITY_API_BASE_URL")?;
        let image_base_url = get_required_url("SERENITY_IMAGE_BASE_URL")?;
        let min_loading_ms = get_env_or_default("SERENITY_MIN_LOADING_MS", "1000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SERENITY_MIN_LOADING_MS".to_string(), e.to_string())
            })?;
        let token_file = PathBuf::from(get_env_or_default(
            "SERENITY_TOKEN_FILE",
            DEFAULT_TOKEN_FILE,
        ));

        Ok(Self {
            base_url,
            image_base_url,
            min_loading: Duration::from_millis(min_loading_ms),
            token_file,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable and parse it as an absolute URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    parse_base_url(key, &get_required_env(key)?)
}

fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("X", " https://api.example.com/api ").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api");
    }

    #[test]
    fn test_parse_base_url_rejects_relative() {
        assert!(matches!(
            parse_base_url("X", "/api"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        let err = parse_base_url("X", "ftp://files.example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ApiConfig::new(
            Url::parse("http://localhost:8000/api").unwrap(),
            Url::parse("http://localhost:8000/storage").unwrap(),
        );
        assert_eq!(config.min_loading, DEFAULT_MIN_LOADING);
        assert_eq!(config.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
        assert_eq!(config.without_loading_delay().min_loading, Duration::ZERO);
    }
}
