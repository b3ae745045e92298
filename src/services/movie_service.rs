//! One metadata lookup for a settled query.
//!
//! [`MovieService::lookup`] is shared by the debounced controller and the
//! HTTP API. It decides between search and discover, talks to the catalog,
//! turns failures into the message a user sees, and hands successful
//! searches to the popularity tracker without waiting on it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::constants::{limits::MIN_SEARCH_CHARS, tmdb::FETCH_FAILED_MESSAGE};
use crate::models::MovieSummary;
use crate::services::TrendingService;

/// What to ask the metadata API for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// Title search for a term longer than two characters.
    Search(String),
    /// Most popular movies, no term.
    Discover,
}

impl MovieQuery {
    /// Short inputs (two characters or fewer) browse instead of search.
    /// Length is counted in characters, not bytes.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        if input.chars().count() > MIN_SEARCH_CHARS {
            Self::Search(input.to_string())
        } else {
            Self::Discover
        }
    }

    /// Full request URL. The term is percent-encoded exactly once here and
    /// must not be encoded again by the caller.
    #[must_use]
    pub fn endpoint(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Self::Search(term) => {
                format!("{base}/search/movie?query={}", urlencoding::encode(term))
            }
            Self::Discover => format!("{base}/discover/movie?sort_by=popularity.desc"),
        }
    }

    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Search(term) => Some(term),
            Self::Discover => None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Discover => "discover",
        }
    }
}

impl fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(term) => write!(f, "search '{term}'"),
            Self::Discover => write!(f, "discover"),
        }
    }
}

/// Why a lookup failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("metadata API returned HTTP {0}")]
    Status(u16),

    #[error("metadata API reported failure: {}", .0.as_deref().unwrap_or("no message"))]
    Api(Option<String>),

    #[error("malformed metadata response: {0}")]
    Decode(String),
}

impl LookupError {
    /// Message for display: the API's own message when it sent one,
    /// otherwise a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(Some(message)) if !message.is_empty() => message.clone(),
            _ => FETCH_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Source of movie metadata.
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetches one page of results. An absent results array is an empty page.
    async fn fetch(&self, query: &MovieQuery) -> Result<Vec<MovieSummary>, LookupError>;
}

/// Result of one lookup, shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Loaded { movies: Vec<MovieSummary> },
    Failed { message: String },
}

impl LookupOutcome {
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            Self::Loaded { movies } => movies,
            Self::Failed { .. } => &[],
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Loaded { .. } => None,
            Self::Failed { message } => Some(message),
        }
    }
}

#[derive(Clone)]
pub struct MovieService {
    catalog: Arc<dyn MovieCatalog>,
    trending: Arc<dyn TrendingService>,
    /// Search-count upserts that have been started but not yet joined.
    pending_counts: Arc<Mutex<JoinSet<()>>>,
}

impl MovieService {
    pub fn new(catalog: Arc<dyn MovieCatalog>, trending: Arc<dyn TrendingService>) -> Self {
        Self {
            catalog,
            trending,
            pending_counts: Arc::default(),
        }
    }

    #[must_use]
    pub fn trending(&self) -> &Arc<dyn TrendingService> {
        &self.trending
    }

    /// Runs one lookup for a settled input.
    ///
    /// A successful term search with at least one hit spawns the search-count
    /// upsert and returns without waiting for it.
    pub async fn lookup(&self, input: &str) -> LookupOutcome {
        let query = MovieQuery::from_input(input);
        debug!(%query, "Fetching movies");

        match self.catalog.fetch(&query).await {
            Ok(movies) => {
                metrics::counter!(
                    "movie_lookups_total",
                    "mode" => query.mode(),
                    "outcome" => "success"
                )
                .increment(1);

                if let (Some(term), Some(first)) = (query.term(), movies.first()) {
                    self.spawn_record_search(term.to_string(), first.clone());
                }

                LookupOutcome::Loaded { movies }
            }
            Err(e) => {
                metrics::counter!(
                    "movie_lookups_total",
                    "mode" => query.mode(),
                    "outcome" => "failure"
                )
                .increment(1);
                warn!(%query, error = %e, "Error fetching movies");

                LookupOutcome::Failed {
                    message: e.user_message(),
                }
            }
        }
    }

    /// Waits for every search-count upsert started so far.
    ///
    /// Lookups never wait on the upsert themselves. Callers that are about to
    /// drop the runtime (one-shot CLI commands, server shutdown) call this
    /// first so the counts are not lost.
    pub async fn flush_search_counts(&self) {
        let mut pending = std::mem::take(
            &mut *self
                .pending_counts
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                warn!("Search-count task did not complete: {}", e);
            }
        }
    }

    fn spawn_record_search(&self, term: String, movie: MovieSummary) {
        let trending = self.trending.clone();
        let mut pending = self
            .pending_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Reap finished upserts so a long-running server does not accumulate them.
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            trending.record_search(&term, &movie).await;
        });
    }
}
