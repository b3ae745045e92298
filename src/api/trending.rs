use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, TrendingDto};
use crate::constants::limits::MAX_TRENDING_LIMIT;

#[derive(Debug, Deserialize)]
pub struct TrendingRequest {
    pub limit: Option<u64>,
}

/// Most searched terms, highest count first.
///
/// # Endpoint
/// `GET /api/trending?limit=<n>`
pub async fn get_trending(
    State(state): State<Arc<AppState>>,
    Query(request): Query<TrendingRequest>,
) -> Result<Json<ApiResponse<Vec<TrendingDto>>>, ApiError> {
    let limit = request
        .limit
        .unwrap_or(state.config().query.trending_limit);

    if limit == 0 || limit > MAX_TRENDING_LIMIT {
        return Err(ApiError::validation(format!(
            "limit must be between 1 and {MAX_TRENDING_LIMIT}"
        )));
    }

    let records = state.trending().top_trending(limit).await?;
    Ok(Json(ApiResponse::success(TrendingDto::ranked(records))))
}
