use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiResponse, AppState, MovieDto, MoviesDto};
use crate::services::{LookupOutcome, MovieQuery};

#[derive(Debug, Deserialize)]
pub struct MoviesRequest {
    #[serde(default)]
    pub query: String,
}

/// Search or browse movies.
///
/// # Endpoint
/// `GET /api/movies?query=<text>`
///
/// Queries of two characters or fewer return popular movies. A failed lookup
/// is a normal response with `success: false` and the message to display.
pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(request): Query<MoviesRequest>,
) -> Json<ApiResponse<MoviesDto>> {
    let mode = MovieQuery::from_input(&request.query).mode();

    match state.movie_service().lookup(&request.query).await {
        LookupOutcome::Loaded { movies } => Json(ApiResponse::success(MoviesDto {
            mode,
            query: request.query,
            results: movies.into_iter().map(MovieDto::from).collect(),
        })),
        LookupOutcome::Failed { message } => Json(ApiResponse::error(message)),
    }
}
