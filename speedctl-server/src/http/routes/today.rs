//! Today's measurements - downloads, uploads, pings, averages
//!
//! "Today" is the current UTC calendar day, regardless of server time zone.

use axum::{extract::State, routing::get, Json, Router};

use crate::db::ResultRepo;
use crate::http::error::ApiError;
use crate::models::{Averages, DownloadPoint, UtcDay};
use crate::state::AppState;

/// GET /downloads
async fn downloads(State(state): State<AppState>) -> Result<Json<Vec<DownloadPoint>>, ApiError> {
    let mut conn = state.acquire().await?;
    let points = ResultRepo::new(&mut conn)
        .downloads_on(UtcDay::today())
        .await?;
    Ok(Json(points))
}

/// GET /uploads
async fn uploads(State(state): State<AppState>) -> Result<Json<Vec<Option<f64>>>, ApiError> {
    let mut conn = state.acquire().await?;
    let values = ResultRepo::new(&mut conn).uploads_on(UtcDay::today()).await?;
    Ok(Json(values))
}

/// GET /pings
async fn pings(State(state): State<AppState>) -> Result<Json<Vec<Option<f64>>>, ApiError> {
    let mut conn = state.acquire().await?;
    let values = ResultRepo::new(&mut conn).pings_on(UtcDay::today()).await?;
    Ok(Json(values))
}

/// GET /averages
async fn averages(State(state): State<AppState>) -> Result<Json<Averages>, ApiError> {
    let mut conn = state.acquire().await?;
    let averages = ResultRepo::new(&mut conn)
        .averages_on(UtcDay::today())
        .await?;
    Ok(Json(averages))
}

/// Today routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/downloads", get(downloads))
        .route("/uploads", get(uploads))
        .route("/pings", get(pings))
        .route("/averages", get(averages))
}
