//! Whole-table endpoints - all rows, payloads, paging, lookup by id

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::ResultRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ResultId;
use crate::models::{ColumnValue, DynamicRow, PageParams, PageRequest, PageSummary};
use crate::state::AppState;

/// Single payload response for `/specified/{id}`
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub data: ColumnValue,
}

/// GET /allresults
async fn all_results(State(state): State<AppState>) -> Result<Json<Vec<DynamicRow>>, ApiError> {
    let mut conn = state.acquire().await?;
    let rows = ResultRepo::new(&mut conn).all().await?;
    Ok(Json(rows))
}

/// GET /fulldata
async fn full_data(State(state): State<AppState>) -> Result<Json<Vec<ColumnValue>>, ApiError> {
    let mut conn = state.acquire().await?;
    let data = ResultRepo::new(&mut conn).all_data().await?;
    Ok(Json(data))
}

/// GET /list?page=&pageSize=
async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageSummary<DynamicRow>>, ApiError> {
    let page = PageRequest::from(params);
    tracing::debug!(page = page.page, page_size = page.page_size, "listing results");

    let mut conn = state.acquire().await?;
    let summary = ResultRepo::new(&mut conn).page(page).await?;
    Ok(Json(summary))
}

/// GET /specified/{id}
async fn specified(
    State(state): State<AppState>,
    ResultId(id): ResultId,
) -> Result<Json<DataResponse>, ApiError> {
    let mut conn = state.acquire().await?;
    let data = ResultRepo::new(&mut conn).data_by_id(id).await?;
    Ok(Json(DataResponse { data }))
}

/// Result routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/allresults", get(all_results))
        .route("/fulldata", get(full_data))
        .route("/list", get(list))
        .route("/specified/{id}", get(specified))
}
