//! Process configuration loaded from the environment (and `.env` when present).

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default cap on an uploaded inventory file.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("USE_PERSISTENT_STORES=true but neither POSTGRES_URL nor DATABASE_URL is set")]
    MissingDatabaseUrl,
}

/// Which store backs the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres(DatabaseConfig),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var("POSTGRES_URL").or_else(|| var("DATABASE_URL"));
        let use_persistent = match var("USE_PERSISTENT_STORES") {
            Some(v) => Some(parse_var("USE_PERSISTENT_STORES", &v)?),
            None => None,
        };

        let store = match (use_persistent, database_url) {
            (Some(false), _) | (None, None) => StoreBackend::InMemory,
            (Some(true), None) => return Err(ConfigError::MissingDatabaseUrl),
            (_, Some(url)) => {
                let require_ssl = match var("DATABASE_SSLMODE_REQUIRE") {
                    Some(v) => parse_var("DATABASE_SSLMODE_REQUIRE", &v)?,
                    None => true,
                };
                let url = if require_ssl { with_sslmode_require(&url) } else { url };

                let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
                    Some(v) => parse_var("DATABASE_MAX_CONNECTIONS", &v)?,
                    None => 10,
                };
                let acquire_timeout_secs: u64 = match var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
                    Some(v) => parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", &v)?,
                    None => 30,
                };

                StoreBackend::Postgres(DatabaseConfig {
                    url,
                    max_connections,
                    acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                })
            }
        };

        let port = match var("PORT") {
            Some(v) => parse_var("PORT", &v)?,
            None => 8080,
        };
        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(v) => parse_var("MAX_UPLOAD_BYTES", &v)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            store,
            max_upload_bytes,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

/// Managed Postgres providers reject plaintext connections; default to TLS
/// unless the URL already chooses a mode.
pub fn with_sslmode_require(url: &str) -> String {
    if url.contains("sslmode=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}sslmode=require")
}
