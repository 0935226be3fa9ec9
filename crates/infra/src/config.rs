//! Configuration loading and representation.
//!
//! Values come from the process environment, after a `.env` file (searched
//! from the working directory upward) has been merged into it. Variables that
//! are already set keep their value.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `HOST` | `0.0.0.0` | listen address |
//! | `PORT` | `5000` | listen port |
//! | `USE_PERSISTENT_STORES` | `false` | use Postgres instead of the in-memory store |
//! | `DATABASE_URL` | — | Postgres URL, required when persistent stores are on |

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Merge `.env` into the process environment, then load from it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_after(dotenv::dotenv())
    }

    fn load_after(env_file: dotenv::Result<PathBuf>) -> Result<Self, ConfigError> {
        match env_file {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_env()
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (environment, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => raw.trim().to_lowercase().parse::<bool>().map_err(|_| ConfigError::Invalid {
                key: "USE_PERSISTENT_STORES",
                value: raw.clone(),
            })?,
            None => false,
        };

        let database_url = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            host,
            port,
            use_persistent_stores,
            database_url,
        })
    }

    /// Dev/test configuration: in-memory store, ephemeral port on loopback.
    pub fn in_memory() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            use_persistent_stores: false,
            database_url: None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
