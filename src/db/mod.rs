use crate::models::{NewSearchCount, SearchCountRecord};
use crate::services::trending_service::{SearchCountStore, StoreError};
use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// Local `SQLite` search-count store.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn search_count_repo(&self) -> repositories::search_count::SearchCountRepository {
        repositories::search_count::SearchCountRepository::new(self.conn.clone())
    }

    pub async fn count_search_terms(&self) -> Result<u64> {
        Ok(self.search_count_repo().count_all().await?)
    }
}

#[async_trait::async_trait]
impl SearchCountStore for Store {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError> {
        Ok(self.search_count_repo().find_by_term(term).await?)
    }

    async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError> {
        Ok(self.search_count_repo().create(record).await?)
    }

    async fn update_count(&self, record_id: &str, count: i64) -> Result<(), StoreError> {
        Ok(self.search_count_repo().update_count(record_id, count).await?)
    }

    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
        Ok(self.search_count_repo().top_by_count(limit).await?)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
