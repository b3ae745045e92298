pub mod tmdb {

    pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

    /// Shown whenever a lookup fails without an API-provided message.
    pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch movies";

    pub const USER_AGENT: &str = "Reelscout/0.1";
}

pub mod limits {

    pub const DEFAULT_TRENDING_LIMIT: u64 = 5;

    /// Queries at or below this many characters browse instead of search.
    pub const MIN_SEARCH_CHARS: usize = 2;

    pub const MAX_TRENDING_LIMIT: u64 = 100;
}
