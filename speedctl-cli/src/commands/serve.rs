//! HTTP server command
//!
//! Builds the database pool from flags/environment and runs the API server.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use speedctl_server::config::{DbConfig, DEFAULT_MAX_CONNECTIONS};
use speedctl_server::db::{create_lazy_pool, create_pool};
use speedctl_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT_HOST", default_value_t = 3000)]
    pub port: u16,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database holding the `results` table
    #[arg(long, env = "DB_NAME", default_value = "speedtest")]
    pub db_name: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_CONNECTION_LIMIT", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub connection_limit: u32,

    /// Seconds a request waits for a free connection before failing
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub acquire_timeout_secs: u64,

    /// Only accept browser requests from localhost origins
    #[arg(long)]
    pub cors_localhost: bool,

    /// Start without a database connection; connect on the first request
    #[arg(long)]
    pub lazy_connect: bool,
}

impl ServeArgs {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.connection_limit,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: !self.cors_localhost,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db = args.db_config();
    tracing::info!(
        host = %db.host,
        port = db.port,
        database = %db.database,
        max_connections = db.max_connections,
        "Connecting to database"
    );

    // Create database pool
    let pool = if args.lazy_connect {
        create_lazy_pool(&db)
    } else {
        create_pool(&db)
            .await
            .with_context(|| format!("Failed to connect to {}:{}", db.host, db.port))?
    };

    // Run server (blocks until shutdown)
    run_server(pool, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
