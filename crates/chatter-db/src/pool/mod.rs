//! Database connection pool management

use std::time::Duration;

use chatter_common::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

// Re-export for consumers
pub use sqlx::sqlite::SqlitePool;

/// Create a connection pool for the database described by `config`.
///
/// Foreign key enforcement is switched on for every connection; the
/// schema relies on it for referential integrity.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let connect = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    let mut options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

    let mut max_connections = config.max_connections;
    if config.is_in_memory() {
        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        max_connections = 1;
        options = options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = options.connect_with(connect).await?;

    info!(
        path = %config.path,
        max_connections,
        "database pool created"
    );

    Ok(pool)
}

/// Open a pool against `path`, or the default database location when `None`.
pub async fn connect(path: Option<&str>) -> Result<SqlitePool, sqlx::Error> {
    let config = match path {
        Some(p) => DatabaseConfig {
            path: p.to_string(),
            ..DatabaseConfig::default()
        },
        None => DatabaseConfig::default(),
    };
    create_pool(&config).await
}
