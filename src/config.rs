//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.
//! Settings are read once at process start and handed to the handler.

use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub host: String,
    pub max_pool_size: usize,
    pub require_tls: bool,
    pub bootstrap_schema: bool,
}

impl DatabaseConfig {
    pub const DEFAULT_POOL_SIZE: usize = 10;

    /// Parse a DATABASE_URL connection string (postgresql://...)
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let mut parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(ConfigError::InvalidValue(format!(
                "Unsupported DATABASE_URL scheme: {}",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let sslmode = parsed
            .query_pairs()
            .find(|(k, _)| k == "sslmode")
            .map(|(_, v)| v.into_owned());

        // tokio-postgres only knows disable/prefer/require. Certificate checks
        // happen in rustls against the native roots, so verify-* becomes require.
        let url = match sslmode.as_deref() {
            Some("verify-ca" | "verify-full") => {
                let pairs: Vec<(String, String)> = parsed
                    .query_pairs()
                    .map(|(k, v)| {
                        if k == "sslmode" {
                            (k.into_owned(), "require".to_string())
                        } else {
                            (k.into_owned(), v.into_owned())
                        }
                    })
                    .collect();
                parsed.query_pairs_mut().clear().extend_pairs(pairs);
                parsed.to_string()
            }
            Some("disable" | "prefer" | "require") | None => url.to_string(),
            Some(other) => {
                return Err(ConfigError::InvalidValue(format!(
                    "Unsupported sslmode in DATABASE_URL: {}",
                    other
                )))
            }
        };

        // Managed Postgres providers (Neon and friends) refuse plaintext
        let require_tls = host.contains("neon.tech")
            || matches!(
                sslmode.as_deref(),
                Some("require" | "verify-ca" | "verify-full")
            );

        Ok(Self {
            url,
            host,
            max_pool_size: Self::DEFAULT_POOL_SIZE,
            require_tls,
            bootstrap_schema: false,
        })
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    /// `None` when DATABASE_URL is unset; every non-OPTIONS request then fails with 500
    pub database: Option<DatabaseConfig>,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let mut database = DatabaseConfig::from_url(url.trim())?;
                database.max_pool_size = lookup("DB_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DatabaseConfig::DEFAULT_POOL_SIZE);
                database.bootstrap_schema = lookup("DB_BOOTSTRAP_SCHEMA")
                    .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false);
                Some(database)
            }
            None => None,
        };

        Ok(Self { server, database })
    }
}
