//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Everything [`ApiConfig::from_env`] reads, plus:
//!
//! ## Optional
//! - `SERENITY_CART_MODE` - `slots` (one entry per add) or `merged` (one
//!   entry per item with a quantity); default `slots`

use std::str::FromStr;

use serenity_api::{ApiConfig, ConfigError};

use crate::cart::CartMode;

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Spa API connection settings.
    pub api: ApiConfig,
    /// How repeated adds of the same item are stored.
    pub cart_mode: CartMode,
}

impl StorefrontConfig {
    #[must_use]
    pub const fn new(api: ApiConfig, cart_mode: CartMode) -> Self {
        Self { api, cart_mode }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api = ApiConfig::from_env()?;
        let cart_mode = match std::env::var("SERENITY_CART_MODE") {
            Ok(value) => CartMode::from_str(&value).map_err(|e| {
                ConfigError::InvalidEnvVar("SERENITY_CART_MODE".to_string(), e.to_string())
            })?,
            Err(_) => CartMode::default(),
        };

        Ok(Self { api, cart_mode })
    }
}
