//! Configuration loading and validation
//!
//! The credentials file is TOML with kebab-case keys. It carries the API
//! credentials plus optional fetch and retry tuning; everything has a
//! default except the credentials themselves.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, Credentials, FetchConfig, RetryConfig};
pub use validation::validate;
