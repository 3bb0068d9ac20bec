// src/config.rs

use std::{env, fmt};

use dotenvy::dotenv;

/// Number of completed attempts returned by the latest-submissions query.
pub const LATEST_SUBMISSIONS_LIMIT: i64 = 5;

/// Layout used when rendering `completed_at` ("HH:MM DD Month YYYY").
pub const COMPLETED_AT_FORMAT: &str = "%H:%M %d %B %Y";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

/// Raised when the environment cannot produce a usable [`Config`].
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            rust_log,
            server_port: parse_var("SERVER_PORT", 8080)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", 3)?,
            cors_origins,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}
