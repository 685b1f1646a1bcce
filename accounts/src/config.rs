//! Accounts Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which account store to build (default: memory)
    pub store: StoreBackend,

    /// `PostgreSQL` settings, present when `DATABASE_URL` is set
    pub database: Option<DatabaseConfig>,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

/// Account store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!("unknown account store backend: {other}"),
        }
    }
}

/// `PostgreSQL` connection pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,

    /// Pool size ceiling (default: 20)
    pub max_connections: u32,

    /// Connections kept warm (default: 1)
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection (default: 5)
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Load database settings; fails if `DATABASE_URL` is unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_or("DB_MIN_CONNECTIONS", 1),
            acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5),
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => bail!("unknown log format: {other}"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,

    /// Output format for the fmt layer
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "callbox_accounts=info".into(),
            log_format: LogFormat::Json,
        }
    }
}

impl ObservabilityConfig {
    /// Load logging settings; fails on an unrecognized `LOG_FORMAT`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let log_format = match env::var("LOG_FORMAT") {
            Ok(value) => value.parse::<LogFormat>().context("Invalid LOG_FORMAT")?,
            Err(_) => defaults.log_format,
        };

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let store = match env::var("ACCOUNT_STORE") {
            Ok(value) => value.parse::<StoreBackend>().context("Invalid ACCOUNT_STORE")?,
            Err(_) => StoreBackend::default(),
        };

        let database = match store {
            StoreBackend::Postgres => Some(
                DatabaseConfig::from_env().context("ACCOUNT_STORE=postgres requires a database")?,
            ),
            StoreBackend::Memory => DatabaseConfig::from_env().ok(),
        };

        Ok(Self {
            store,
            database,
            observability: ObservabilityConfig::from_env()?,
        })
    }

    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
