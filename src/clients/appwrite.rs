//! Appwrite databases REST client, scoped to the search-count collection.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::config::StoreConfig;
use crate::models::{NewSearchCount, SearchCountRecord};
use crate::services::trending_service::{SearchCountStore, StoreError};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

/// One entry of the `queries[]` parameter, in Appwrite's JSON query syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentQuery {
    Equal { attribute: String, value: String },
    OrderDesc { attribute: String },
    Limit(u64),
}

impl DocumentQuery {
    pub fn equal(attribute: &str, value: &str) -> Self {
        Self::Equal {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn order_desc(attribute: &str) -> Self {
        Self::OrderDesc {
            attribute: attribute.to_string(),
        }
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        let value = match self {
            Self::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Self::OrderDesc { attribute } => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Self::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
        };
        value.to_string()
    }
}

/// A search-count document as stored in Appwrite.
#[derive(Debug, Deserialize)]
struct SearchCountDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: i64,
    #[serde(default)]
    movie_id: i64,
    #[serde(default)]
    poster_url: String,
}

impl From<SearchCountDocument> for SearchCountRecord {
    fn from(doc: SearchCountDocument) -> Self {
        Self {
            record_id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            poster_url: doc.poster_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<SearchCountDocument>,
}

#[derive(Debug, Serialize)]
struct CreateDocument<'a> {
    #[serde(rename = "documentId")]
    document_id: &'a str,
    data: NewDocumentData<'a>,
}

#[derive(Debug, Serialize)]
struct NewDocumentData<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: i64,
    movie_id: i64,
    poster_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    api_key: Option<String>,
}

impl AppwriteClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &StoreConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint,
            urlencoding::encode(&self.database_id),
            urlencoding::encode(&self.collection_id)
        )
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id);

        match &self.api_key {
            Some(key) => builder.header(KEY_HEADER, key),
            None => builder,
        }
    }

    fn parse_url(raw: &str) -> Result<Url, StoreError> {
        Url::parse(raw).map_err(|e| StoreError::Transport(format!("invalid store URL {raw}: {e}")))
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AppwriteErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(StoreError::Status { status, message })
    }

    pub async fn list_documents(
        &self,
        queries: &[DocumentQuery],
    ) -> Result<Vec<SearchCountRecord>, StoreError> {
        let mut url = Self::parse_url(&self.documents_url())?;
        {
            let mut pairs = url.query_pairs_mut();
            for query in queries {
                pairs.append_pair("queries[]", &query.to_query_string());
            }
        }

        debug!("Appwrite list: {}", url);

        let response = self.request(Method::GET, url).send().await?;
        let list: DocumentList = Self::check(response).await?.json().await?;

        Ok(list.documents.into_iter().map(Into::into).collect())
    }

    pub async fn create_document(
        &self,
        record: &NewSearchCount,
    ) -> Result<SearchCountRecord, StoreError> {
        let url = Self::parse_url(&self.documents_url())?;
        let body = CreateDocument {
            document_id: "unique()",
            data: NewDocumentData {
                search_term: &record.search_term,
                count: record.count,
                movie_id: record.movie_id,
                poster_url: &record.poster_url,
            },
        };

        let response = self.request(Method::POST, url).json(&body).send().await?;
        let doc: SearchCountDocument = Self::check(response).await?.json().await?;

        Ok(doc.into())
    }

    pub async fn update_document_count(&self, document_id: &str, count: i64) -> Result<(), StoreError> {
        let raw = format!(
            "{}/{}",
            self.documents_url(),
            urlencoding::encode(document_id)
        );
        let url = Self::parse_url(&raw)?;
        let body = json!({ "data": { "count": count } });

        let response = self.request(Method::PATCH, url).json(&body).send().await?;
        Self::check(response).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SearchCountStore for AppwriteClient {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, StoreError> {
        let found = self
            .list_documents(&[DocumentQuery::equal("searchTerm", term)])
            .await?;
        Ok(found.into_iter().next())
    }

    async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, StoreError> {
        self.create_document(&record).await
    }

    async fn update_count(&self, record_id: &str, count: i64) -> Result<(), StoreError> {
        self.update_document_count(record_id, count).await
    }

    async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, StoreError> {
        self.list_documents(&[DocumentQuery::Limit(limit), DocumentQuery::order_desc("count")])
            .await
    }

    fn backend_name(&self) -> &'static str {
        "appwrite"
    }
}
