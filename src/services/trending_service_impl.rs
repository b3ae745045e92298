use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{MovieSummary, NewSearchCount, SearchCountRecord};
use crate::services::trending_service::{
    SearchCountStore, StoreError, TrendingError, TrendingService,
};

/// What an upsert did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created { record_id: String },
    Incremented { record_id: String, count: i64 },
}

/// [`TrendingService`] over any [`SearchCountStore`], counting with a
/// non-atomic read-modify-write.
///
/// Two concurrent upserts for the same term can both miss and both create,
/// or both read `k` and both write `k + 1`.
pub struct DocumentTrendingService {
    store: Arc<dyn SearchCountStore>,
    image_base_url: String,
}

impl DocumentTrendingService {
    pub fn new(store: Arc<dyn SearchCountStore>, image_base_url: impl Into<String>) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
        }
    }

    /// The upsert itself, with errors intact. [`TrendingService::record_search`]
    /// is the swallowing wrapper.
    pub async fn upsert(
        &self,
        term: &str,
        movie: &MovieSummary,
    ) -> Result<UpsertOutcome, StoreError> {
        if let Some(existing) = self.store.find_by_term(term).await? {
            let count = existing.count + 1;
            self.store
                .update_count(&existing.record_id, count)
                .await?;
            return Ok(UpsertOutcome::Incremented {
                record_id: existing.record_id,
                count,
            });
        }

        let created = self
            .store
            .create(NewSearchCount {
                search_term: term.to_string(),
                count: 1,
                movie_id: movie.id,
                poster_url: movie.poster_url(&self.image_base_url),
            })
            .await?;

        Ok(UpsertOutcome::Created {
            record_id: created.record_id,
        })
    }
}

#[async_trait::async_trait]
impl TrendingService for DocumentTrendingService {
    async fn record_search(&self, term: &str, movie: &MovieSummary) {
        match self.upsert(term, movie).await {
            Ok(UpsertOutcome::Created { record_id }) => {
                metrics::counter!("search_count_upserts_total", "outcome" => "created")
                    .increment(1);
                info!(term, record_id = %record_id, "Started counting search term");
            }
            Ok(UpsertOutcome::Incremented { record_id, count }) => {
                metrics::counter!("search_count_upserts_total", "outcome" => "incremented")
                    .increment(1);
                debug!(term, record_id = %record_id, count, "Incremented search count");
            }
            Err(e) => {
                metrics::counter!("search_count_upserts_total", "outcome" => "failed")
                    .increment(1);
                warn!(term, error = %e, "Error updating search count");
            }
        }
    }

    async fn top_trending(&self, limit: u64) -> Result<Vec<SearchCountRecord>, TrendingError> {
        match self.store.top_by_count(limit).await {
            Ok(mut records) => {
                // Stores are asked for `limit`, but do not trust them to honour it.
                records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
                Ok(records)
            }
            Err(e) => {
                warn!(
                    backend = self.store.backend_name(),
                    error = %e,
                    "Failed to fetch trending movies"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<SearchCountRecord>>,
        fail: AtomicBool,
    }

    impl MemoryStore {
        fn check(&self) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(StoreError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        fn snapshot(&self) -> Vec<SearchCountRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SearchCountStore for MemoryStore {
        async fn find_by_term(
            &self,
            term: &str,
        ) -> Result<Option<SearchCountRecord>, StoreError> {
            self.check()?;
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.search_term == term)
                .cloned())
        }

        async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let created = SearchCountRecord {
                record_id: format!("doc-{}", records.len() + 1),
                search_term: record.search_term,
                count: record.count,
                movie_id: record.movie_id,
                poster_url: record.poster_url,
            };
            records.push(created.clone());
            Ok(created)
        }

        async fn update_count(&self, record_id: &str, count: i64) -> Result<(), StoreError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.record_id == record_id)
                .ok_or_else(|| StoreError::Status {
                    status: 404,
                    message: "document not found".to_string(),
                })?;
            record.count = count;
            Ok(())
        }

        async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
            self.check()?;
            let mut records = self.snapshot();
            records.sort_by(|a, b| b.count.cmp(&a.count));
            records.truncate(usize::try_from(limit).unwrap());
            Ok(records)
        }

        fn backend_name(&self) -> &'static str {
            "memory"
        }
    }

    fn movie(id: i64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            vote_average: 7.0,
            poster_path: Some(format!("/poster-{id}.jpg")),
            release_date: Some("2021-09-15".to_string()),
            original_language: "en".to_string(),
        }
    }

    fn service(store: &Arc<MemoryStore>) -> DocumentTrendingService {
        DocumentTrendingService::new(store.clone(), "https://image.tmdb.org/t/p/w500")
    }

    #[tokio::test]
    async fn first_search_creates_record_with_count_one() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);

        let outcome = service.upsert("dune", &movie(438_631)).await.unwrap();

        assert!(matches!(outcome, UpsertOutcome::Created { .. }));
        let records = store.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].search_term, "dune");
        assert_eq!(records[0].count, 1);
        assert_eq!(records[0].movie_id, 438_631);
        assert_eq!(
            records[0].poster_url,
            "https://image.tmdb.org/t/p/w500//poster-438631.jpg"
        );
    }

    #[tokio::test]
    async fn repeat_search_increments_without_new_record() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);

        service.record_search("dune", &movie(1)).await;
        service.record_search("dune", &movie(2)).await;
        service.record_search("dune", &movie(3)).await;

        let records = store.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 3);
        // The movie recorded on creation is kept.
        assert_eq!(records[0].movie_id, 1);
    }

    #[tokio::test]
    async fn record_search_swallows_store_failures() {
        let store = Arc::new(MemoryStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let service = service(&store);

        service.record_search("dune", &movie(1)).await;

        assert!(store.snapshot().is_empty());
        assert!(service.upsert("dune", &movie(1)).await.is_err());
    }

    #[tokio::test]
    async fn top_trending_is_bounded_and_ordered() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);

        for (term, times) in [("a", 1), ("b", 4), ("c", 2), ("d", 7), ("e", 3), ("f", 5)] {
            for _ in 0..times {
                service.record_search(term, &movie(1)).await;
            }
        }

        let top = service.top_trending(5).await.unwrap();
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(top[0].search_term, "d");
        assert!(top.iter().all(|r| r.search_term != "a"));
    }

    #[tokio::test]
    async fn top_trending_propagates_store_failure() {
        let store = Arc::new(MemoryStore::default());
        store.fail.store(true, Ordering::SeqCst);

        let err = service(&store).top_trending(5).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
