use serde::Serialize;

use crate::models::{MovieSummary, SearchCountRecord};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesDto {
    /// `search` or `discover`.
    pub mode: &'static str,
    pub query: String,
    pub results: Vec<MovieDto>,
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub vote_average: f64,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<String>,
    pub original_language: String,
}

impl From<MovieSummary> for MovieDto {
    fn from(movie: MovieSummary) -> Self {
        let release_year = movie.release_year().map(str::to_string);
        Self {
            id: movie.id,
            title: movie.title,
            vote_average: movie.vote_average,
            poster_path: movie.poster_path,
            release_date: movie.release_date,
            release_year,
            original_language: movie.original_language,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendingDto {
    /// 1-based position in the strip.
    pub rank: usize,
    pub id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

impl TrendingDto {
    #[must_use]
    pub fn ranked(records: Vec<SearchCountRecord>) -> Vec<Self> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| Self {
                rank: i + 1,
                id: r.record_id,
                search_term: r.search_term,
                count: r.count,
                movie_id: r.movie_id,
                poster_url: r.poster_url,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub store_backend: &'static str,
    pub metrics_enabled: bool,
}
