//! Configuration management for the vote intake system
//!
//! Loads configuration from environment variables with validated defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Election-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Required length of a voter's national ID (default: 8 digits)
    pub national_id_length: usize,
}

impl ElectionConfig {
    /// Load election configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let national_id_length = std::env::var("VOTACION_NATIONAL_ID_LENGTH")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|_| Error::validation("VOTACION_NATIONAL_ID_LENGTH"))?;

        let config = Self { national_id_length };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            national_id_length: 8,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.national_id_length == 0 || self.national_id_length > 20 {
            return Err(Error::validation("VOTACION_NATIONAL_ID_LENGTH"));
        }
        Ok(())
    }

    /// Check that a national ID matches the configured format
    ///
    /// National IDs are fixed-length numeric strings; anything else is an
    /// enrollment error, never a valid lookup key.
    pub fn is_valid_national_id(&self, national_id: &str) -> bool {
        national_id.len() == self.national_id_length
            && national_id.chars().all(|c| c.is_ascii_digit())
    }
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self::for_testing()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub election: ElectionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        let election = ElectionConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
        };

        Ok(Self { election, logging })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            election: ElectionConfig::for_testing(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
