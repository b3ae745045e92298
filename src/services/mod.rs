pub mod debounce;

pub mod movie_service;
pub use movie_service::{LookupError, LookupOutcome, MovieCatalog, MovieQuery, MovieService};

pub mod query_controller;
pub use query_controller::{QueryController, QueryState, ViewState};

pub mod trending_service;
pub mod trending_service_impl;
pub use trending_service::{SearchCountStore, StoreError, TrendingError, TrendingService};
pub use trending_service_impl::{DocumentTrendingService, UpsertOutcome};
