//! Practicum homework status API client

use std::sync::Arc;

use async_trait::async_trait;

use crate::io::HttpClient;
use crate::notifier::truncate_chars;
use crate::status::{Cursor, StatusFetcher};

/// Longest error body kept in [`crate::ReviewError::Upstream`]
pub const MAX_UPSTREAM_BODY_CHARS: usize = 500;

/// Fetches raw homework status payloads from the Practicum API
pub struct PracticumClient {
    endpoint: reqwest::Url,
    token: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, http: Arc<dyn HttpClient>) -> crate::Result<Self> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| {
            crate::ReviewError::Config(format!("Invalid status endpoint {:?}: {}", endpoint, e))
        })?;

        tracing::debug!("Created PracticumClient for {}", endpoint);

        Ok(Self {
            endpoint,
            token: token.to_string(),
            http,
        })
    }

    fn url_for(&self, cursor: Cursor) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("from_date", &cursor.to_string());
        url.into()
    }
}

#[async_trait]
impl StatusFetcher for PracticumClient {
    async fn fetch(&self, cursor: Cursor) -> crate::Result<serde_json::Value> {
        let url = self.url_for(cursor);
        let auth = format!("OAuth {}", self.token);
        tracing::debug!("Fetching homework statuses from {}", url);

        let response = self
            .http
            .get(&url, &[("Authorization", auth.as_str())])
            .await?;

        if response.status != 200 {
            tracing::debug!("Non-200 response from status API: {}", response.status);
            return Err(crate::ReviewError::Upstream {
                status: response.status,
                body: truncate_chars(&response.body, MAX_UPSTREAM_BODY_CHARS),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            crate::ReviewError::MalformedResponse(format!("response body is not JSON: {}", e))
        })
    }
}
