//! Database layer - connection pool, row decoding and repositories
//!
//! # Design Principles
//!
//! - Connection pool (default 5 connections), injected, never global
//! - Every request-supplied value is a bound parameter
//! - Rows of unknown shape decode through the column's SQL type

pub mod pool;
pub mod repos;
pub mod row;

pub use pool::{create_lazy_pool, create_pool};
pub use repos::*;
