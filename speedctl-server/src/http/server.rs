//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS by default, localhost-only on request
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;

use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;
use sqlx::MySqlPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: true)
    ///
    /// When false only localhost origins are accepted.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_permissive: true,
        }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost"),
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::today::router())
        .merge(routes::results::router())
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(%uri, "no route");
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::default()).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: MySqlPool, config: ServerConfig) -> Result<(), ServerError> {
    if !config.cors_permissive {
        tracing::info!("CORS: localhost origins only");
    }

    let app = build_router(AppState::new(pool), config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server is running on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::response::Response;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tower::ServiceExt;

    use crate::config::DbConfig;
    use crate::db::create_lazy_pool;

    /// MySQL wire peer that logs in anyone, answers session setup and pings,
    /// and fails every statement with "table doesn't exist".
    struct BrokenTableServer {
        port: u16,
        connections: Arc<AtomicUsize>,
        rejected: Arc<AtomicUsize>,
    }

    // CLIENT_LONG_PASSWORD | CLIENT_CONNECT_WITH_DB | CLIENT_PROTOCOL_41
    const SERVER_CAPABILITIES: u16 = 0x0001 | 0x0008 | 0x0200;
    const OK_PACKET: &[u8] = &[0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
    const COM_QUIT: u8 = 0x01;
    const COM_QUERY: u8 = 0x03;
    const COM_PING: u8 = 0x0e;
    const COM_STMT_CLOSE: u8 = 0x19;

    impl BrokenTableServer {
        async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let port = listener.local_addr().unwrap().port();
            let connections = Arc::new(AtomicUsize::new(0));
            let rejected = Arc::new(AtomicUsize::new(0));

            let (accepted, failed) = (connections.clone(), rejected.clone());
            tokio::spawn(async move {
                while let Ok((socket, _)) = listener.accept().await {
                    accepted.fetch_add(1, Ordering::SeqCst);
                    let failed = failed.clone();
                    tokio::spawn(async move {
                        let _ = serve_connection(socket, failed).await;
                    });
                }
            });

            Self {
                port,
                connections,
                rejected,
            }
        }

        fn connections(&self) -> usize {
            self.connections.load(Ordering::SeqCst)
        }

        fn rejected(&self) -> usize {
            self.rejected.load(Ordering::SeqCst)
        }
    }

    async fn serve_connection(
        mut socket: TcpStream,
        rejected: Arc<AtomicUsize>,
    ) -> std::io::Result<()> {
        let mut handshake = vec![0x0a];
        handshake.extend_from_slice(b"5.7.0-speedctl\0");
        handshake.extend_from_slice(&1u32.to_le_bytes());
        handshake.extend_from_slice(b"scramble\0");
        handshake.extend_from_slice(&SERVER_CAPABILITIES.to_le_bytes());
        handshake.push(0x21); // utf8_general_ci
        handshake.extend_from_slice(&[0x02, 0x00]); // autocommit
        handshake.extend_from_slice(&[0x00, 0x00]); // upper capabilities
        handshake.push(0x00);
        handshake.extend_from_slice(&[0x00; 10]);
        write_packet(&mut socket, 0, &handshake).await?;

        let (seq, _login) = read_packet(&mut socket).await?;
        write_packet(&mut socket, seq.wrapping_add(1), OK_PACKET).await?;

        loop {
            let (seq, command) = read_packet(&mut socket).await?;
            let reply = seq.wrapping_add(1);
            match command.first().copied() {
                None | Some(COM_QUIT) => return Ok(()),
                Some(COM_STMT_CLOSE) => {}
                Some(COM_PING) => write_packet(&mut socket, reply, OK_PACKET).await?,
                Some(COM_QUERY) if command[1..].starts_with(b"SET ") => {
                    write_packet(&mut socket, reply, OK_PACKET).await?
                }
                Some(_) => {
                    rejected.fetch_add(1, Ordering::SeqCst);
                    let mut err = vec![0xff];
                    err.extend_from_slice(&1146u16.to_le_bytes());
                    err.extend_from_slice(b"#42S02");
                    err.extend_from_slice(b"Table 'speedtest.results' doesn't exist");
                    write_packet(&mut socket, reply, &err).await?;
                }
            }
        }
    }

    async fn read_packet(socket: &mut TcpStream) -> std::io::Result<(u8, Vec<u8>)> {
        let mut header = [0u8; 4];
        socket.read_exact(&mut header).await?;
        let len = u32::from_le_bytes([header[0], header[1], header[2], 0]) as usize;
        let mut payload = vec![0u8; len];
        socket.read_exact(&mut payload).await?;
        Ok((header[3], payload))
    }

    async fn write_packet(socket: &mut TcpStream, seq: u8, payload: &[u8]) -> std::io::Result<()> {
        let len = (payload.len() as u32).to_le_bytes();
        let mut frame = vec![len[0], len[1], len[2], seq];
        frame.extend_from_slice(payload);
        socket.write_all(&frame).await
    }

    /// Router whose pool points at a closed port: every query fails.
    fn unreachable_app(max_connections: u32) -> Router {
        let config = DbConfig {
            host: "127.0.0.1".into(),
            port: 1,
            max_connections,
            acquire_timeout: Duration::from_millis(300),
            ..DbConfig::default()
        };
        build_router(AppState::new(create_lazy_pool(&config)), true)
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.cors_permissive);
    }

    #[tokio::test]
    async fn health_needs_no_database() {
        let app = unreachable_app(1);
        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["pool"], json!({"size": 0, "idle": 0, "max": 1}));
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected_before_querying() {
        let app = unreachable_app(1);

        let response = get(&app, "/specified/1%20OR%201=1").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid id"}));

        let response = get(&app, "/specified/abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn database_failure_is_generic_500() {
        let app = unreachable_app(1);

        for uri in [
            "/downloads",
            "/uploads",
            "/pings",
            "/averages",
            "/allresults",
            "/fulldata",
            "/list",
            "/specified/1",
        ] {
            let response = get(&app, uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(
                body_json(response).await,
                json!({"error": "Internal Server Error"}),
                "{uri}"
            );
        }
    }

    #[tokio::test]
    async fn repeated_failures_do_not_wedge_the_router() {
        let app = unreachable_app(1);
        for _ in 0..5 {
            let response = get(&app, "/list?page=2&pageSize=10").await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn failed_queries_hand_their_connection_back() {
        let server = BrokenTableServer::start().await;
        let config = DbConfig {
            host: "127.0.0.1".into(),
            port: server.port,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(2),
            ..DbConfig::default()
        };
        let pool = create_lazy_pool(&config);
        let app = build_router(AppState::new(pool.clone()), true);

        // One connection; a leak would time out the second request before
        // it ever reached the server
        let uris = ["/list", "/allresults", "/averages", "/specified/1", "/uploads"];
        for uri in uris.iter().cycle().take(10) {
            let response = get(&app, uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(
                body_json(response).await,
                json!({"error": "Internal Server Error"}),
                "{uri}"
            );
        }

        assert_eq!(server.rejected(), 10);
        assert_eq!(server.connections(), 1);
        assert_eq!(pool.size(), 1);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = unreachable_app(1);
        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let app = unreachable_app(1);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://dashboard.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
