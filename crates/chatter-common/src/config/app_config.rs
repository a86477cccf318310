//! Application configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).
//! A variable that is present but unparseable is an error, not a silent
//! fallback to the default.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
///
/// `path` is the SQLite database file; the special value `:memory:` selects
/// an in-memory database (one connection, never recycled, so the data
/// survives for the lifetime of the pool).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            busy_timeout_secs: default_busy_timeout_secs(),
            create_if_missing: default_create_if_missing(),
        }
    }
}

impl DatabaseConfig {
    /// Configuration for an in-memory database
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            ..Self::default()
        }
    }

    /// Check whether this configuration points at an in-memory database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

// Default value functions
fn default_app_name() -> String {
    "chatter".to_string()
}

fn default_db_path() -> String {
    "chatter.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

fn default_busy_timeout_secs() -> u64 {
    5
}

fn default_create_if_missing() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("CHATTER_APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: match env::var("CHATTER_ENV").ok().as_deref() {
                    None => Environment::default(),
                    Some("production") => Environment::Production,
                    Some("development") => Environment::Development,
                    Some(_) => return Err(ConfigError::InvalidVar("CHATTER_ENV")),
                },
            },
            database: DatabaseConfig {
                path: env::var("CHATTER_DB_PATH").unwrap_or_else(|_| default_db_path()),
                max_connections: parse_var(
                    "CHATTER_DB_MAX_CONNECTIONS",
                    default_max_connections(),
                )?,
                acquire_timeout_secs: parse_var(
                    "CHATTER_DB_ACQUIRE_TIMEOUT_SECS",
                    default_acquire_timeout_secs(),
                )?,
                busy_timeout_secs: parse_var(
                    "CHATTER_DB_BUSY_TIMEOUT_SECS",
                    default_busy_timeout_secs(),
                )?,
                create_if_missing: parse_var(
                    "CHATTER_DB_CREATE_IF_MISSING",
                    default_create_if_missing(),
                )?,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar(name)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidVar(&'static str),
}
