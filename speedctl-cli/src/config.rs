//! Environment loading for speedctl
//!
//! Settings come from the process environment; a `.env` file in the
//! current directory fills in anything not already set.

use std::path::PathBuf;

/// Load `./.env` if present.
///
/// Runs before argument parsing so clap's `env` fallbacks see the values.
/// dotenvy never overwrites variables that are already set.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Log where configuration came from. Call once tracing is up.
pub fn report_dotenv(loaded: Option<&PathBuf>) {
    match loaded {
        Some(path) => tracing::info!("Loaded configuration from {}", path.display()),
        None => tracing::debug!("No .env file found, using environment variables only"),
    }
}
