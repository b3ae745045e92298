use std::sync::Arc;

use tracing::info;

use crate::clients::appwrite::AppwriteClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::{Config, StoreBackend};
use crate::constants::tmdb::USER_AGENT;
use crate::db::Store;
use crate::services::{
    DocumentTrendingService, MovieCatalog, MovieService, SearchCountStore, TrendingService,
};

/// Build a shared HTTP client for the metadata API and the hosted store.
/// No request timeout is set: a hung request stays pending until it settles.
fn build_shared_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Clients and services constructed once at start-up and passed to every
/// surface (HTTP API, CLI commands, interactive browser).
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub movie_service: MovieService,

    pub trending: Arc<dyn TrendingService>,

    pub store: Arc<dyn SearchCountStore>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client()?;

        let store: Arc<dyn SearchCountStore> = match config.store.backend {
            StoreBackend::Appwrite => {
                info!(
                    endpoint = %config.store.endpoint,
                    collection = %config.store.collection_id,
                    "Using Appwrite search-count store"
                );
                Arc::new(AppwriteClient::with_shared_client(
                    http_client.clone(),
                    &config.store,
                ))
            }
            StoreBackend::Sqlite => Arc::new(
                Store::with_pool_options(
                    &config.store.database_path,
                    config.store.max_db_connections,
                    config.store.min_db_connections,
                )
                .await?,
            ),
        };

        let catalog = Arc::new(TmdbClient::with_shared_client(http_client, &config.tmdb));

        Ok(Self::with_services(config, catalog, store))
    }

    /// Wires the services around caller-supplied collaborators.
    pub fn with_services(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn SearchCountStore>,
    ) -> Self {
        let trending = Arc::new(DocumentTrendingService::new(
            store.clone(),
            config.tmdb.image_base_url.clone(),
        )) as Arc<dyn TrendingService>;

        let movie_service = MovieService::new(catalog, trending.clone());

        Self {
            config: Arc::new(config),
            movie_service,
            trending,
            store,
        }
    }

    #[must_use]
    pub fn store_backend(&self) -> &'static str {
        self.store.backend_name()
    }
}
