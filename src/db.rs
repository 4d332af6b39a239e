//! Database access
//!
//! The handler talks to storage through [`ContentStore`], which hands out one
//! [`ContentSession`] per call. A session owns a single pooled connection and
//! gives it back when dropped, so release happens on every exit path.

pub mod postgres;
pub mod queries;

#[cfg(test)]
pub mod memory;

use crate::config::DatabaseConfig;
use crate::entity::Entity;
use crate::error::{ApiResult, AppError};
use crate::models::{ContentUpdate, NewContent, Record};
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::info;

pub use postgres::PgContentStore;

/// Source of per-call sessions
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn session(&self) -> ApiResult<Box<dyn ContentSession>>;
}

/// One connection, held for the duration of a single call
#[async_trait]
pub trait ContentSession: Send + Sync {
    /// All rows of a table in its natural order, optionally capped
    async fn list(&self, entity: Entity, limit: Option<i64>) -> ApiResult<Vec<Record>>;

    async fn insert(&self, content: &NewContent) -> ApiResult<Record>;

    /// `None` when no row matches the key
    async fn update(&self, update: &ContentUpdate) -> ApiResult<Option<Record>>;

    /// Number of rows removed
    async fn delete(&self, entity: Entity, id: i32) -> ApiResult<u64>;
}

/// Create a connection pool for the configured database
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.url = Some(config.url.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.max_pool_size));

    let pool = if config.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
        cfg.create_pool(Some(Runtime::Tokio1), tls)
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
    }
    .map_err(|e| AppError::Internal(format!("Failed to create pool: {}", e)))?;

    info!(
        "Database pool created for {} (TLS: {}, max size: {})",
        config.host, config.require_tls, config.max_pool_size
    );
    Ok(pool)
}

/// Create the content tables if they don't exist
pub async fn bootstrap_schema(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;

    for statement in queries::BOOTSTRAP_SCHEMA {
        client.execute(*statement, &[]).await?;
    }

    info!("Content tables initialized");
    Ok(())
}
