use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::models::MovieSummary;
use crate::services::movie_service::{LookupError, MovieCatalog, MovieQuery};

/// Envelope of a TMDB list response.
///
/// Besides `results`, two failure shapes are recognised: the legacy
/// `{"response": "false", "error": ...}` flag and TMDB's native
/// `{"success": false, "status_message": ...}`.
#[derive(Debug, Default, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Option<Vec<MovieSummary>>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl MoviePage {
    /// `Some(message)` when the payload itself reports a failure.
    #[must_use]
    pub fn reported_failure(&self) -> Option<Option<String>> {
        let flagged_false = match &self.response {
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("false"),
            Some(serde_json::Value::Bool(b)) => !b,
            _ => false,
        };

        if flagged_false {
            return Some(self.error.clone().or_else(|| self.status_message.clone()));
        }

        if self.success == Some(false) {
            return Some(self.status_message.clone().or_else(|| self.error.clone()));
        }

        None
    }

    pub fn into_results(self) -> Result<Vec<MovieSummary>, LookupError> {
        if let Some(message) = self.reported_failure() {
            return Err(LookupError::Api(message));
        }
        Ok(self.results.unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn fetch_page(&self, query: &MovieQuery) -> Result<Vec<MovieSummary>, LookupError> {
        let url = query.endpoint(&self.base_url);
        debug!("TMDB request: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("TMDB error body: {}", body);
            return Err(LookupError::Status(status.as_u16()));
        }

        let page: MoviePage = response.json().await?;
        page.into_results()
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbClient {
    async fn fetch(&self, query: &MovieQuery) -> Result<Vec<MovieSummary>, LookupError> {
        self.fetch_page(query).await
    }
}
