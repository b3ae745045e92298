//! Test doubles shared by the integration tests: an in-memory search-count
//! store, a scripted movie catalog, and fake TMDB/Appwrite HTTP services.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reelscout::models::{MovieSummary, NewSearchCount, SearchCountRecord};
use reelscout::services::{
    LookupError, MovieCatalog, MovieQuery, SearchCountStore, StoreError,
};
use serde_json::{Value, json};

pub fn movie(id: i64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        vote_average: 7.1,
        poster_path: Some(format!("/poster-{id}.jpg")),
        release_date: Some("2021-09-15".to_string()),
        original_language: "en".to_string(),
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SearchCountRecord>>,
    fail: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    /// Every operation takes `latency` before touching the records, like a
    /// remote store would.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn records(&self) -> Vec<SearchCountRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count_for(&self, term: &str) -> Option<i64> {
        self.records()
            .into_iter()
            .find(|r| r.search_term == term)
            .map(|r| r.count)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Status {
                status: 503,
                message: "store offline".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl SearchCountStore for MemoryStore {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError> {
        self.round_trip().await;
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
        self.round_trip().await;
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
        self.round_trip().await;
        self.check()?;
        if let Some(record) = self
            .records
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.record_id == record_id)
        {
            record.count = count;
        }
        Ok(())
    }

    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
        self.round_trip().await;
        self.check()?;
        let mut records = self.records();
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records.truncate(usize::try_from(limit).unwrap());
        Ok(records)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// ---------------------------------------------------------------------------
// Scripted catalog
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<MovieQuery>>,
    failure: Mutex<Option<LookupError>>,
    latency: Option<Duration>,
}

impl FakeCatalog {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<MovieQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, error: LookupError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

#[async_trait::async_trait]
impl MovieCatalog for FakeCatalog {
    async fn fetch(&self, query: &MovieQuery) -> Result<Vec<MovieSummary>, LookupError> {
        self.calls.lock().unwrap().push(query.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        Ok(match query {
            MovieQuery::Search(term) if term == "zzzz" => vec![],
            MovieQuery::Search(term) => vec![movie(100, term), movie(101, "Another")],
            MovieQuery::Discover => vec![movie(1, "Popular A"), movie(2, "Popular B")],
        })
    }
}

// ---------------------------------------------------------------------------
// Fake HTTP services
// ---------------------------------------------------------------------------

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub raw_query: Option<String>,
    pub authorization: Option<String>,
}

/// What the fake TMDB answers with.
#[derive(Debug, Clone)]
pub enum TmdbReply {
    Results,
    Status(u16),
    Body(Value),
}

#[derive(Clone)]
pub struct FakeTmdb {
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    pub reply: Arc<Mutex<TmdbReply>>,
}

impl FakeTmdb {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_reply(&self, reply: TmdbReply) {
        *self.reply.lock().unwrap() = reply;
    }
}

/// Starts a fake TMDB and returns its API base URL (ending in `/3`).
pub async fn spawn_fake_tmdb() -> (String, FakeTmdb) {
    let fake = FakeTmdb {
        requests: Arc::default(),
        reply: Arc::new(Mutex::new(TmdbReply::Results)),
    };

    let app = Router::new()
        .fallback(tmdb_handler)
        .with_state(fake.clone());

    let base = serve(app).await;
    (format!("{base}/3"), fake)
}

async fn tmdb_handler(State(fake): State<FakeTmdb>, req: Request) -> Response {
    let recorded = RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        raw_query: req.uri().query().map(str::to_string),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    };
    let path = recorded.path.clone();
    fake.requests.lock().unwrap().push(recorded);

    let reply = fake.reply.lock().unwrap().clone();
    match reply {
        TmdbReply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({"success": false, "status_message": "upstream exploded"})),
        )
            .into_response(),
        TmdbReply::Body(body) => Json(body).into_response(),
        TmdbReply::Results if path.ends_with("/search/movie") => Json(json!({
            "page": 1,
            "results": [
                {"id": 438631, "title": "Dune", "vote_average": 7.8,
                 "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                 "release_date": "2021-09-15", "original_language": "en"},
                {"id": 693134, "title": "Dune: Part Two", "vote_average": 8.2,
                 "poster_path": "/1pdfLvkbY9ohJlCjQH2CZjjYVvJ.jpg",
                 "release_date": "2024-02-27", "original_language": "en"}
            ]
        }))
        .into_response(),
        TmdbReply::Results if path.ends_with("/discover/movie") => Json(json!({
            "page": 1,
            "results": [
                {"id": 1, "title": "Popular A", "vote_average": 6.0,
                 "poster_path": null, "release_date": "2025-01-01",
                 "original_language": "en"}
            ]
        }))
        .into_response(),
        TmdbReply::Results => StatusCode::NOT_FOUND.into_response(),
    }
}

/// In-memory stand-in for the Appwrite documents API.
#[derive(Clone, Default)]
pub struct FakeAppwrite {
    pub documents: Arc<Mutex<Vec<Value>>>,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    pub fail: Arc<AtomicBool>,
}

impl FakeAppwrite {
    pub fn documents(&self) -> Vec<Value> {
        self.documents.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a fake Appwrite and returns its endpoint (ending in `/v1`).
pub async fn spawn_fake_appwrite() -> (String, FakeAppwrite) {
    let fake = FakeAppwrite::default();
    let app = Router::new()
        .fallback(appwrite_handler)
        .with_state(fake.clone());
    let base = serve(app).await;
    (format!("{base}/v1"), fake)
}

fn parse_queries(raw: Option<&str>) -> Vec<Value> {
    url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k == "queries[]")
        .map(|(_, v)| serde_json::from_str(&v).unwrap())
        .collect()
}

async fn appwrite_handler(State(fake): State<FakeAppwrite>, req: Request) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let raw_query = req.uri().query().map(str::to_string);
    let has_project = req.headers().contains_key("x-appwrite-project");

    fake.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        raw_query: raw_query.clone(),
        authorization: None,
    });

    if !has_project {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Project is not accessible", "code": 401})),
        )
            .into_response();
    }

    if fake.fail.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server Error", "code": 500})),
        )
            .into_response();
    }

    let body: Value = {
        let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .unwrap();
        if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        }
    };

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    // v1 / databases / {db} / collections / {coll} / documents [/ {id}]
    let document_id = segments.get(6).map(|s| (*s).to_string());

    match (method.as_str(), document_id) {
        ("GET", None) => {
            let mut docs = fake.documents();
            let mut limit = usize::MAX;
            for query in parse_queries(raw_query.as_deref()) {
                match query["method"].as_str().unwrap() {
                    "equal" => {
                        let attribute = query["attribute"].as_str().unwrap().to_string();
                        let values = query["values"].as_array().unwrap().clone();
                        docs.retain(|d| values.contains(&d[&attribute]));
                    }
                    "orderDesc" => {
                        let attribute = query["attribute"].as_str().unwrap().to_string();
                        docs.sort_by(|a, b| b[&attribute].as_i64().cmp(&a[&attribute].as_i64()));
                    }
                    "limit" => {
                        limit = usize::try_from(query["values"][0].as_u64().unwrap()).unwrap();
                    }
                    other => panic!("unexpected query method {other}"),
                }
            }
            docs.truncate(limit);
            Json(json!({"total": docs.len(), "documents": docs})).into_response()
        }
        ("POST", None) => {
            let mut documents = fake.documents.lock().unwrap();
            let id = format!("doc{}", documents.len() + 1);
            let mut doc = body["data"].clone();
            doc["$id"] = json!(id);
            doc["$collectionId"] = json!(segments.get(4).copied().unwrap_or_default());
            documents.push(doc.clone());
            (StatusCode::CREATED, Json(doc)).into_response()
        }
        ("PATCH", Some(id)) => {
            let mut documents = fake.documents.lock().unwrap();
            let Some(doc) = documents.iter_mut().find(|d| d["$id"] == json!(id)) else {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({"message": "Document with the requested ID could not be found.", "code": 404})),
                )
                    .into_response();
            };
            if let Some(fields) = body["data"].as_object() {
                for (key, value) in fields {
                    doc[key] = value.clone();
                }
            }
            Json(doc.clone()).into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
