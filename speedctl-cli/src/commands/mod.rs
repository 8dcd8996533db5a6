//! Command implementations for speedctl CLI

pub mod serve;

pub use serve::run_serve;
