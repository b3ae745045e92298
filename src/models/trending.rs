use serde::{Deserialize, Serialize};

/// Persisted popularity counter for one search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountRecord {
    /// Opaque identifier assigned by the store.
    pub record_id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

/// Fields for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSearchCount {
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}
