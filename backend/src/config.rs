// src/config.rs

use std::env;
use std::net::SocketAddr;

/// Points granted when an exercise becomes correctly answered.
pub const POINTS_PER_CORRECT_ANSWER: i64 = 10;

/// Default token lifetime: one day.
pub const DEFAULT_JWT_EXPIRATION_SECS: u64 = 60 * 60 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Insert the sample curriculum on startup.
    pub seed_sample_data: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has an invalid value: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://learnpath.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("JWT_EXPIRATION", raw))?,
            Err(_) => DEFAULT_JWT_EXPIRATION_SECS,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::Invalid("BIND_ADDR", raw))?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let seed_sample_data = env::var("SEED_SAMPLE_DATA")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            seed_sample_data,
        })
    }
}
