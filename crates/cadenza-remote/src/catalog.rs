//! Performance catalog client.
//!
//! The catalog exposes a single search endpoint. The same endpoint serves
//! both user queries and the bulk snapshot used to build the autocomplete
//! corpus (an empty `q`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use cadenza_core::Performance;

use crate::config::Config;
use crate::error::{RemoteError, RemoteResult};

const SOURCE_NAME: &str = "Catalog";

/// Page requested for every search.
pub const SEARCH_PAGE: u32 = 1;

/// Page size for every search; large enough to return "everything".
pub const SEARCH_LIMIT: u32 = 3000;

pub(crate) const USER_AGENT: &str = concat!(
    "cadenza/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/oxur/cadenza)"
);

// ---------------------------------------------------------------------------
// Response types (private -- the catalog wraps results twice)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Option<Vec<Performance>>,
    #[serde(rename = "totalCount", default)]
    total_count: Option<u64>,
}

impl SearchResponse {
    fn into_performances(self) -> Vec<Performance> {
        self.data.and_then(|page| page.data).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can answer a catalog search.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn search(&self, query: &str) -> RemoteResult<Vec<Performance>>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Catalog API client.
///
/// Every call is a single round trip with no retry. Any non-success status
/// is an error for that call.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client rooted at `base_url`
    /// (e.g. `https://host/api/v1`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Create a client from the catalog settings in `config`.
    pub fn from_config(config: &Config) -> RemoteResult<Self> {
        Self::new(config.catalog_base_url.clone(), config.request_timeout())
    }

    fn search_url(&self) -> String {
        format!("{}/performances/search", self.base_url.trim_end_matches('/'))
    }

    /// Search the catalog. `query` is sent as-is; callers trim it.
    pub async fn search_performances(&self, query: &str) -> RemoteResult<Vec<Performance>> {
        let page = SEARCH_PAGE.to_string();
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .http
            .get(self.search_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("q", query), ("page", page.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Http {
                source_name: SOURCE_NAME.to_string(),
                message: format!("Search failed: {status}"),
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| RemoteError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        if let Some(page) = &body.data {
            log::debug!(
                "Catalog search {:?}: {} records (total {:?}, message {:?})",
                query,
                page.data.as_ref().map_or(0, Vec::len),
                page.total_count,
                body.message
            );
        }

        Ok(body.into_performances())
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn search(&self, query: &str) -> RemoteResult<Vec<Performance>> {
        self.search_performances(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_client_creation() {
        let client = CatalogClient::new("https://example.com/api/v1", Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_search_url_joins_path() {
        let client = CatalogClient::new("https://example.com/api/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.search_url(),
            "https://example.com/api/v1/performances/search"
        );
    }

    #[test]
    fn test_from_config() {
        let client = CatalogClient::from_config(&Config::default()).unwrap();
        assert!(client.search_url().starts_with(crate::config::DEFAULT_CATALOG_BASE_URL));
    }

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "message": "ok",
            "success": true,
            "data": {
                "data": [
                    {"id": "1", "videoNo": 3, "songName": "Imagine", "YesNo": false, "songGenres": []}
                ],
                "totalCount": 1
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let performances = response.into_performances();
        assert_eq!(performances.len(), 1);
        assert_eq!(performances[0].song_name, "Imagine");
        assert_eq!(performances[0].video_no, 3);
    }

    #[test]
    fn test_search_response_without_records() {
        let json = r#"{"message": "none", "success": true, "data": {"data": []}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_performances().is_empty());
    }

    #[test]
    fn test_search_response_without_data() {
        let json = r#"{"message": "none", "success": true}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_performances().is_empty());
    }
}
