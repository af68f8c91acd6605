//! Historical search API client
//!
//! One client instance is shared across all workers (`reqwest::Client` is
//! cheaply cloneable). The endpoint is overridable so tests can point it at
//! a mock server.

use crate::config::Credentials;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default submission search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.pushshift.io/reddit/search/submission";

/// Maximum number of items the endpoint returns per call
pub const PAGE_LIMIT: u32 = 500;

/// Search API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True if the error is worth retrying
    ///
    /// Timeouts, connection failures, rate limiting, server errors, and
    /// malformed JSON (the endpoint occasionally returns truncated bodies
    /// under load) are transient. Other client errors are permanent and
    /// reported immediately: a 404 for a bad target name, or a request
    /// that could not even be built (bad URL, bad header), which no number
    /// of retries will fix.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status } => *status == 429 || (500..600).contains(status),
            ApiError::Decode(_) => true,
        }
    }
}

/// One submission as returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: String,
    pub created_utc: i64,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub selftext: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<SearchItem>,
}

/// Client for the historical submission search API
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    /// Builds a client against the default endpoint
    pub fn new(credentials: &Credentials) -> Result<Self, reqwest::Error> {
        Self::with_endpoint(credentials, DEFAULT_ENDPOINT)
    }

    /// Builds a client against a custom endpoint
    pub fn with_endpoint(
        credentials: &Credentials,
        endpoint: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Performs one paginated search call
    ///
    /// Requests up to [`PAGE_LIMIT`] submissions with `after < created_utc <
    /// before`, sorted newest-first. The caller drives pagination by moving
    /// `before` down to the smallest `created_utc` it has seen.
    pub async fn search(
        &self,
        params: &[(String, String)],
        after: i64,
        before: i64,
    ) -> Result<Vec<SearchItem>, ApiError> {
        let mut query: Vec<(String, String)> = vec![
            ("limit".to_string(), PAGE_LIMIT.to_string()),
            ("sort".to_string(), "desc".to_string()),
            ("sort_type".to_string(), "created_utc".to_string()),
            ("after".to_string(), after.to_string()),
            ("before".to_string(), before.to_string()),
        ];
        query.extend(params.iter().cloned());

        let response = self.http.get(&self.endpoint).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        tracing::trace!(
            "Search returned {} items in ({}, {})",
            body.data.len(),
            after,
            before
        );

        Ok(body.data)
    }
}
