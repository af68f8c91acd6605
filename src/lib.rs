//! Reddit-Harvester: a date-windowed Reddit submission fetcher
//!
//! This crate fetches Reddit submissions for a date range and a set of
//! subreddits, post IDs, or raw query parameter sets. The requested range is
//! split into date windows, the cross product of targets and windows is fanned
//! out across a bounded pool of workers, fetched text is cleaned and filtered
//! against a blacklist, and each target's output lands in its own text file.

pub mod client;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod source;
pub mod text;
pub mod window;

use thiserror::Error;

/// Main error type for Reddit-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("Date window error: {0}")]
    Window(#[from] window::WindowError),

    #[error("Blacklist error: {0}")]
    Blacklist(#[from] filter::BlacklistError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("API error: {0}")]
    Api(#[from] client::ApiError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Reddit-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use fetch::{build_tasks, Dispatcher, FetchTask, RunSummary};
pub use filter::Blacklist;
pub use source::Target;
pub use window::{windows, DateWindow};
