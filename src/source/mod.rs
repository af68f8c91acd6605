//! Query target resolution
//!
//! The CLI offers three mutually exclusive input modes: a subreddit list, a
//! post-ID list, or a file of raw search-API query parameters. This module
//! reads whichever file was given and turns it into an ordered list of
//! [`Target`]s, each of which knows its search parameters and the name of
//! the output file it writes to.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field separator for query config files (original format: one
/// `key<TAB>value` pair per line)
const CONFIG_FIELD_SEPARATOR: char = '\t';

/// Source-resolution errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input file {path} contains no usable entries")]
    EmptyInput { path: PathBuf },

    #[error("More than one input mode specified; use exactly one of --subs, --posts, --config")]
    AmbiguousMode,

    #[error("No input mode specified; use one of --subs, --posts, --config")]
    NoMode,

    #[error("Invalid query line in {path}: {line:?} (expected key<TAB>value)")]
    InvalidQueryLine { path: PathBuf, line: String },
}

/// One query target: a subreddit, a post ID, or a raw parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Subreddit(String),
    Post(String),
    Query(BTreeMap<String, String>),
}

impl Target {
    /// Query parameters this target contributes to a search call
    pub fn params(&self) -> Vec<(String, String)> {
        match self {
            Target::Subreddit(name) => vec![("subreddit".to_string(), name.clone())],
            Target::Post(id) => vec![("ids".to_string(), id.clone())],
            Target::Query(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Deterministic output file stem for this target
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so the stem
    /// is always a safe single path component.
    pub fn file_stem(&self) -> String {
        let raw = match self {
            Target::Subreddit(name) => name.clone(),
            Target::Post(id) => id.clone(),
            Target::Query(map) => {
                let parts: Vec<String> =
                    map.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                parts.join("_")
            }
        };
        sanitize_stem(&raw)
    }

    /// Short human-readable label used in logs and the final summary
    pub fn label(&self) -> String {
        match self {
            Target::Subreddit(name) => format!("r/{}", name),
            Target::Post(id) => format!("post {}", id),
            Target::Query(_) => format!("query {}", self.file_stem()),
        }
    }
}

fn sanitize_stem(raw: &str) -> String {
    let stem: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

/// Resolves the CLI's input mode into an ordered list of targets
///
/// Exactly one of the three paths must be `Some`; the mutual exclusion is
/// enforced again here so library callers get the same guarantee as the CLI.
///
/// # Errors
///
/// * `SourceError::AmbiguousMode` if more than one path is given
/// * `SourceError::NoMode` if none is given
/// * `SourceError::EmptyInput` if the file yields zero usable entries
pub fn resolve(
    subs: Option<&Path>,
    posts: Option<&Path>,
    config: Option<&Path>,
) -> Result<Vec<Target>, SourceError> {
    let given = [subs.is_some(), posts.is_some(), config.is_some()]
        .iter()
        .filter(|present| **present)
        .count();
    if given > 1 {
        return Err(SourceError::AmbiguousMode);
    }

    if let Some(path) = subs {
        let names = read_entries(path)?;
        Ok(names.into_iter().map(Target::Subreddit).collect())
    } else if let Some(path) = posts {
        let ids = read_entries(path)?;
        Ok(ids.into_iter().map(Target::Post).collect())
    } else if let Some(path) = config {
        let params = read_query_config(path)?;
        Ok(vec![Target::Query(params)])
    } else {
        Err(SourceError::NoMode)
    }
}

/// Reads one entry per line, trimming whitespace and skipping blank lines
/// and `#` comments
fn read_entries(path: &Path) -> Result<Vec<String>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if entries.is_empty() {
        return Err(SourceError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        "Loaded {} entries from {} (first: {:?})",
        entries.len(),
        path.display(),
        entries.first()
    );

    Ok(entries)
}

/// Reads a query config file: one `key<TAB>value` pair per line
fn read_query_config(path: &Path) -> Result<BTreeMap<String, String>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut params = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) =
            line.split_once(CONFIG_FIELD_SEPARATOR)
                .ok_or_else(|| SourceError::InvalidQueryLine {
                    path: path.to_path_buf(),
                    line: line.to_string(),
                })?;
        params.insert(key.trim().to_string(), value.trim().to_string());
    }

    if params.is_empty() {
        return Err(SourceError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(params)
}
