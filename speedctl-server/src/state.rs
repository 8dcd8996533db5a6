//! Application state shared across handlers

use sqlx::mysql::{MySql, MySqlPool};
use sqlx::pool::PoolConnection;
use std::sync::Arc;

use crate::db::DbError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub pool: MySqlPool,
}

impl AppState {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pool }),
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.inner.pool
    }

    /// Check out one connection for the current request.
    ///
    /// Waits while the pool is exhausted. The connection goes back to the
    /// pool when the returned guard is dropped, on every exit path.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, DbError> {
        let conn = self.inner.pool.acquire().await?;
        tracing::trace!(
            idle = self.inner.pool.num_idle(),
            size = self.inner.pool.size(),
            "connection acquired"
        );
        Ok(conn)
    }
}
