//! Authenticated Reddit API client
//!
//! The search API only indexes submissions; the bulk of the corpus is the
//! comments underneath them. This client logs in with the configured client
//! ID and secret (application-only grant) and fetches each submission's
//! comment tree, flattened depth-first.

use crate::client::ApiError;
use crate::config::Credentials;
use serde::Deserialize;
use std::time::Duration;

/// Default OAuth token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Default authenticated API base
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// One comment's author and body text
#[derive(Debug, Clone)]
pub struct CommentText {
    pub author: Option<String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: CommentData,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    replies: Replies,
}

/// The `replies` field is a nested listing, or `""` when there are none
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Replies {
    Thread(Box<Listing>),
    Empty(String),
}

impl Default for Replies {
    fn default() -> Self {
        Replies::Empty(String::new())
    }
}

/// Client for the authenticated Reddit API
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl RedditClient {
    /// Logs in with the application-only grant against the default endpoints
    ///
    /// Called once at startup, before any fetch task runs; a failed login is
    /// a fatal credential error.
    pub async fn authenticate(credentials: &Credentials) -> Result<Self, ApiError> {
        Self::authenticate_with_endpoints(credentials, DEFAULT_TOKEN_URL, DEFAULT_API_BASE).await
    }

    /// Logs in against custom endpoints (used by tests)
    pub async fn authenticate_with_endpoints(
        credentials: &Credentials,
        token_url: &str,
        api_base: &str,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = http
            .post(token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        tracing::debug!("Authenticated with the Reddit API");

        Ok(Self {
            http,
            api_base: api_base.to_string(),
            token: token.access_token,
        })
    }

    /// Fetches a submission's comment tree, flattened depth-first
    ///
    /// Unexpanded "more" stubs are skipped, so comments past the first page
    /// of a very large thread are not retrieved.
    pub async fn comment_bodies(&self, post_id: &str) -> Result<Vec<CommentText>, ApiError> {
        let url = format!("{}/comments/{}", self.api_base, post_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("limit", "500")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        // The endpoint returns two listings: the submission, then its comments
        let listings: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let mut comments = Vec::new();
        if let Some(thread) = listings.get(1) {
            collect_comments(&thread.data.children, &mut comments);
        }

        tracing::trace!("Fetched {} comments for {}", comments.len(), post_id);

        Ok(comments)
    }
}

fn collect_comments(children: &[Thing], out: &mut Vec<CommentText>) {
    for child in children {
        if child.kind != "t1" {
            continue;
        }
        if let Some(body) = &child.data.body {
            out.push(CommentText {
                author: child.data.author.clone(),
                body: body.clone(),
            });
        }
        if let Replies::Thread(listing) = &child.data.replies {
            collect_comments(&listing.data.children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_tree_flattens_depth_first() {
        let json = serde_json::json!({
            "kind": "Listing",
            "data": {
                "children": [
                    {
                        "kind": "t1",
                        "data": {
                            "author": "alice",
                            "body": "top comment",
                            "replies": {
                                "kind": "Listing",
                                "data": {
                                    "children": [
                                        {
                                            "kind": "t1",
                                            "data": {
                                                "author": "bob",
                                                "body": "a reply",
                                                "replies": ""
                                            }
                                        }
                                    ]
                                }
                            }
                        }
                    },
                    { "kind": "more", "data": {} },
                    {
                        "kind": "t1",
                        "data": { "body": "second top", "replies": "" }
                    }
                ]
            }
        });

        let listing: Listing = serde_json::from_value(json).unwrap();
        let mut comments = Vec::new();
        collect_comments(&listing.data.children, &mut comments);

        let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["top comment", "a reply", "second top"]);
        assert_eq!(comments[0].author.as_deref(), Some("alice"));
        assert!(comments[2].author.is_none());
    }

    #[test]
    fn test_missing_replies_field_defaults_to_empty() {
        let json = serde_json::json!({
            "data": {
                "children": [
                    { "kind": "t1", "data": { "author": "x", "body": "lone" } }
                ]
            }
        });

        let listing: Listing = serde_json::from_value(json).unwrap();
        let mut comments = Vec::new();
        collect_comments(&listing.data.children, &mut comments);
        assert_eq!(comments.len(), 1);
    }
}
