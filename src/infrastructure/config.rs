//! Database configuration, read from the environment: a plain struct with a
//! `from_env` constructor, no config-file crate.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::WalletError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, WalletError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| WalletError::InvalidInput("DATABASE_URL must be set".to_string()))?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| WalletError::InvalidInput("DATABASE_MAX_CONNECTIONS must be a u32".to_string()))?
            .unwrap_or(10);

        let connect_timeout_secs = std::env::var("DATABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| {
                WalletError::InvalidInput("DATABASE_CONNECT_TIMEOUT_SECS must be a u64".to_string())
            })?
            .unwrap_or(5);

        Ok(Self {
            url,
            max_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }

    /// Build a connection pool from this configuration.
    pub async fn connect(&self) -> Result<PgPool, WalletError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .connect(&self.url)
            .await
            .map_err(|e| WalletError::infrastructure("connect to database", e))
    }
}
