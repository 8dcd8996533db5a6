//! Repository implementations for database access
//!
//! Repositories borrow a single checked-out connection so that one request
//! holds at most one connection for its whole lifetime.

pub mod results;

pub use results::ResultRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
