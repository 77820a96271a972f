//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup; a `.env` file is honoured for local development.

use crate::models::PlatformVersion;
use std::env;

const DEFAULT_PLATFORM_VERSION: PlatformVersion = PlatformVersion::new(18, 0);
const DEFAULT_LOCATION_BATCH_SIZE: usize = 500;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Platform version the store emulates and the gate checks against
    pub platform_version: PlatformVersion,
    /// Route locations per incremental delivery
    pub location_batch_size: usize,
    /// Optional JSON fixture used to seed the store
    pub fixture_path: Option<String>,
}

impl Config {
    /// Config for tests: no fixture, latest platform.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            platform_version: DEFAULT_PLATFORM_VERSION,
            location_batch_size: DEFAULT_LOCATION_BATCH_SIZE,
            fixture_path: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let platform_version = match env::var("PLATFORM_VERSION") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PLATFORM_VERSION", raw))?,
            Err(_) => DEFAULT_PLATFORM_VERSION,
        };

        let location_batch_size = match env::var("LOCATION_BATCH_SIZE") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::Invalid("LOCATION_BATCH_SIZE", raw)),
            },
            Err(_) => DEFAULT_LOCATION_BATCH_SIZE,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            platform_version,
            location_batch_size,
            fixture_path: env::var("WORKOUT_FIXTURE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
