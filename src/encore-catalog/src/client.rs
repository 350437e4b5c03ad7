//! Catalog client implementation

use tracing::{debug, error};

use crate::models::{TrackDetailResponse, parse_listing};
use crate::{CatalogError, CatalogResult, SearchResult, TrackDetail};

/// Client for the external song-search endpoint.
///
/// Every call builds a fresh HTTP client, so no connection state outlives a
/// single request and concurrent dispatches never share a session.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    api_url: String,
}

impl CatalogClient {
    /// Create a client for the given endpoint URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Get the endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// List candidates matching a free-text query.
    ///
    /// Transport failures are logged and produce an empty list; callers only
    /// distinguish "nothing found".
    pub async fn list_candidates(&self, query: &str) -> Vec<SearchResult> {
        debug!("fetching song listing | query: {query}");

        let response = reqwest::Client::new()
            .get(&self.api_url)
            .query(&[("gm", query)])
            .send()
            .await;

        let text = match response {
            Ok(resp) => {
                let status = resp.status();
                match resp.text().await {
                    Ok(text) => {
                        debug!(
                            "song listing response | status: {status} | length: {}",
                            text.len()
                        );
                        text
                    }
                    Err(e) => {
                        error!("failed to read song listing | query: {query} | error: {e}");
                        return Vec::new();
                    }
                }
            }
            Err(e) => {
                error!("failed to fetch song listing | query: {query} | error: {e}");
                return Vec::new();
            }
        };

        parse_listing(&text)
    }

    /// Fetch full metadata for the `ordinal`-th match of `query`.
    pub async fn fetch_detail(&self, query: &str, ordinal: u32) -> CatalogResult<TrackDetail> {
        debug!("fetching song detail | query: {query} | ordinal: {ordinal}");

        let params = [
            ("gm", query.to_string()),
            ("n", ordinal.to_string()),
            ("type", "json".to_string()),
        ];
        let response = reqwest::Client::new()
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let raw: TrackDetailResponse = serde_json::from_str(&body)
            .map_err(|e| CatalogError::MalformedResponse(e.to_string()))?;
        debug!(
            "song detail response | status: {status} | code: {}",
            raw.code
        );

        raw.into_detail()
    }
}
