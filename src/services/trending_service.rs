//! Search-popularity tracking.
//!
//! Two seams live here. [`SearchCountStore`] is the narrow set of document
//! operations the tracker needs from a backing store. [`TrendingService`] is
//! the single entry point callers use to count a search, so the
//! read-modify-write in the default implementation can later be replaced by
//! an atomic increment-or-create without touching callers.

use crate::models::{MovieSummary, NewSearchCount, SearchCountRecord};
use thiserror::Error;

/// Errors raised by a [`SearchCountStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("malformed store document: {0}")]
    Decode(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors surfaced by [`TrendingService::top_trending`].
#[derive(Debug, Error)]
pub enum TrendingError {
    #[error("failed to fetch trending movies: {0}")]
    Store(#[from] StoreError),
}

/// Document operations used by the popularity tracker.
#[async_trait::async_trait]
pub trait SearchCountStore: Send + Sync {
    /// Returns the first record whose search term equals `term`.
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError>;

    /// Creates a record; the store assigns its id.
    async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError>;

    /// Overwrites the count of an existing record.
    async fn update_count(&self, record_id: &str, count: i64) -> Result<(), StoreError>;

    /// Records ordered by count descending, at most `limit` of them.
    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError>;

    /// Short backend name for status output.
    fn backend_name(&self) -> &'static str;
}

/// Counts searches and ranks them.
///
/// # Examples
///
/// ```rust,ignore
/// use reelscout::services::TrendingService;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn TrendingService>) {
///     let top = service.top_trending(5).await.unwrap_or_default();
///     println!("{} trending terms", top.len());
/// }
/// ```
#[async_trait::async_trait]
pub trait TrendingService: Send + Sync {
    /// Counts one successful search for `term` whose top hit was `movie`.
    ///
    /// Never fails from the caller's point of view: errors are logged and
    /// dropped.
    async fn record_search(&self, term: &str, movie: &MovieSummary);

    /// The `limit` most searched terms, highest count first. Order among
    /// equal counts is whatever the store returns.
    ///
    /// # Errors
    ///
    /// Returns [`TrendingError::Store`] when the store cannot be read.
    async fn top_trending(&self, limit: u64) -> Result<Vec<SearchCountRecord>, TrendingError>;
}
