//! API clients and retry policy
//!
//! Two clients: the unauthenticated historical search API for finding
//! submissions, and the authenticated Reddit API for pulling each
//! submission's comment tree. Both share the bounded retry-with-backoff
//! loop and the `ApiError` taxonomy.

mod api;
mod reddit;
mod retry;

pub use api::{ApiError, SearchClient, SearchItem, DEFAULT_ENDPOINT, PAGE_LIMIT};
pub use reddit::{CommentText, RedditClient, DEFAULT_API_BASE, DEFAULT_TOKEN_URL};
pub use retry::RetryPolicy;
