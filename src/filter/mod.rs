//! Blacklist filtering
//!
//! An optional file of substrings, one per line. Any output line containing
//! one of the entries is dropped before it reaches disk. Matching is
//! case-sensitive: blacklists are typically built from previously scraped
//! output, so entries already carry the exact casing to suppress.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Blacklist loading errors
#[derive(Debug, Error)]
pub enum BlacklistError {
    #[error("Failed to read blacklist file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A set of substrings whose presence in a line causes the line to be dropped
///
/// Read-only after loading; shared across all workers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: Vec<String>,
}

impl Blacklist {
    /// Loads a blacklist from an optional file path
    ///
    /// `None` (no `--blacklist` flag) yields an empty filter that accepts
    /// every line. Entries are trimmed; blank lines are skipped.
    pub fn load(path: Option<&Path>) -> Result<Self, BlacklistError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| BlacklistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("Loaded {} blacklist entries from {}", entries.len(), path.display());

        Ok(Self { entries })
    }

    /// Builds a blacklist from in-memory entries
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// True iff the line contains any blacklist entry as a substring
    pub fn matches(&self, line: &str) -> bool {
        self.entries.iter().any(|entry| line.contains(entry))
    }

    /// Number of loaded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are loaded (filter accepts everything)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
