//! Database connection pool management
//!
//! Uses sqlx MySqlPool with explicit connection limits. The pool is created
//! once at startup and handed to the router through `AppState`.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::DbConfig;

/// Create a MariaDB/MySQL connection pool and open the first connection.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::default()).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<MySqlPool, sqlx::Error> {
    pool_options(config)
        .connect_with(config.connect_options())
        .await
}

/// Create a pool that connects on first use.
///
/// Startup never fails on an unreachable database; the first request does.
pub fn create_lazy_pool(config: &DbConfig) -> MySqlPool {
    pool_options(config).connect_lazy_with(config.connect_options())
}

fn pool_options(config: &DbConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
}
