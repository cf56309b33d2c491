use std::env;

use thiserror::Error;

use crate::application::reservation::{RetryPolicy, DEFAULT_RESERVE_ATTEMPTS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_max_size: u32,
    pub reserve_max_attempts: u32,
    pub statement_timeout_ms: u64,
}

impl AppConfig {
    /// Read the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080u16)?;
        let db_pool_max_size = parse_or(&lookup, "DB_POOL_MAX_SIZE", 10u32)?;
        let reserve_max_attempts =
            parse_or(&lookup, "RESERVE_MAX_ATTEMPTS", DEFAULT_RESERVE_ATTEMPTS)?;
        let statement_timeout_ms = parse_or(&lookup, "STATEMENT_TIMEOUT_MS", 5_000u64)?;

        if db_pool_max_size == 0 {
            return Err(invalid("DB_POOL_MAX_SIZE", "0"));
        }
        if reserve_max_attempts == 0 {
            return Err(invalid("RESERVE_MAX_ATTEMPTS", "0"));
        }

        Ok(Self {
            database_url,
            host,
            port,
            db_pool_max_size,
            reserve_max_attempts,
            statement_timeout_ms,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.reserve_max_attempts,
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(name, &raw)),
        None => Ok(default),
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
    }
}
