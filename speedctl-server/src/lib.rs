//! speedctl-server: read-only HTTP API over speed-test results
//!
//! Serves download/upload/ping measurements stored in a MariaDB/MySQL
//! `results` table: today's samples and averages, full dumps, a paginated
//! listing and lookup by id.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use config::DbConfig;
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
