//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub pool: PoolStatus,
}

/// Connection pool counters
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PoolStatus {
    /// Open connections, idle or checked out
    pub size: u32,
    pub idle: usize,
    pub max: u32,
}

/// GET /health
///
/// Reads the pool's counters only; never checks out a connection.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let pool = state.pool();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        pool: PoolStatus {
            size: pool.size(),
            idle: pool.num_idle(),
            max: pool.options().get_max_connections(),
        },
    })
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
