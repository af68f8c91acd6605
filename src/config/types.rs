use serde::Deserialize;

/// Main configuration structure for Reddit-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub credentials: Credentials,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// API credentials and client identification
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// API client ID
    #[serde(rename = "client-id")]
    pub client_id: String,

    /// API client secret
    #[serde(rename = "client-secret")]
    pub client_secret: String,

    /// User agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Skip submissions deleted by their author
    #[serde(rename = "skip-deleted", default = "default_true")]
    pub skip_deleted: bool,

    /// Skip submissions removed by mods/bots
    #[serde(rename = "skip-removed", default = "default_true")]
    pub skip_removed: bool,

    /// Prefix each output line with the author's username
    #[serde(rename = "print-users", default)]
    pub print_users: bool,

    /// Fetch each submission's comment tree through the authenticated API
    #[serde(rename = "scrape-comments", default = "default_true")]
    pub scrape_comments: bool,

    /// Safety cap on pages fetched per (target, window) task
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Number of days covered by each date window
    #[serde(rename = "window-days", default = "default_window_days")]
    pub window_days: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            skip_deleted: true,
            skip_removed: true,
            print_users: false,
            scrape_comments: true,
            max_pages: default_max_pages(),
            window_days: default_window_days(),
        }
    }
}

/// Retry behavior for transient API failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum delay between attempts (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff
    #[serde(rename = "backoff-multiplier", default = "default_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_multiplier(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> u32 {
    50
}

fn default_window_days() -> u64 {
    1
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_multiplier() -> f64 {
    2.0
}
