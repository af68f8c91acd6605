//! Per-target output files and the final run summary
//!
//! Each target owns exactly one UTF-8 text file in the output directory,
//! named from its sanitized file stem and opened in append mode. All writes
//! go through the single `OutputSet` owned by the dispatcher, so no two
//! workers ever touch the same file.
//!
//! Record serialization is one cleaned text line per output line.

use crate::fetch::{Record, RunSummary};
use crate::source::Target;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The set of open output files, one per target
pub struct OutputSet {
    dir: PathBuf,
    files: HashMap<String, BufWriter<File>>,
}

impl OutputSet {
    /// Creates the output directory if needed and prepares the writer set
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            files: HashMap::new(),
        })
    }

    /// Path of the file a target writes to
    pub fn path_for(&self, target: &Target) -> PathBuf {
        self.dir.join(format!("{}.txt", target.file_stem()))
    }

    /// Appends records to the target's file, returning the count written
    ///
    /// The file is opened lazily on first append and kept open for the rest
    /// of the run.
    pub fn append(&mut self, target: &Target, records: &[Record]) -> std::io::Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let stem = target.file_stem();
        let writer = match self.files.entry(stem) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let path = self.dir.join(format!("{}.txt", entry.key()));
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                tracing::debug!("Opened output file {}", path.display());
                entry.insert(BufWriter::new(file))
            }
        };

        for record in records {
            writeln!(writer, "{}", record.text)?;
        }

        Ok(records.len() as u64)
    }

    /// Flushes every open file
    pub fn flush_all(&mut self) -> std::io::Result<()> {
        for writer in self.files.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for OutputSet {
    fn drop(&mut self) {
        // Best effort: the dispatcher flushes explicitly before returning,
        // this covers early exits.
        let _ = self.flush_all();
    }
}

/// Prints the final run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Tasks:");
    println!("  Succeeded: {}", summary.tasks_succeeded);
    println!("  Failed: {}", summary.tasks_failed);
    println!();

    println!("Records:");
    println!("  Written: {}", summary.records_written);
    println!("  Filtered by blacklist: {}", summary.lines_filtered);
    println!();

    if summary.interrupted {
        println!("Run was interrupted; output files were flushed.\n");
    }

    if !summary.failures.is_empty() {
        println!("Failed target/window pairs (re-run with a matching range):");
        for failure in &summary.failures {
            println!("  - {} {}: {}", failure.target, failure.window, failure.error);
        }
        println!();
    }

    if summary.is_success() {
        println!("Done.");
    } else {
        println!("Completed with failures.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_creates_file_per_target() {
        let dir = TempDir::new().unwrap();
        let mut writers = OutputSet::new(dir.path()).unwrap();

        let target = Target::Subreddit("test".to_string());
        let records = vec![
            Record {
                text: "first line".to_string(),
            },
            Record {
                text: "second line".to_string(),
            },
        ];

        let written = writers.append(&target, &records).unwrap();
        assert_eq!(written, 2);
        writers.flush_all().unwrap();

        let content = std::fs::read_to_string(dir.path().join("test.txt")).unwrap();
        assert_eq!(content, "first line\nsecond line\n");
    }

    #[test]
    fn test_append_accumulates_across_calls() {
        let dir = TempDir::new().unwrap();
        let mut writers = OutputSet::new(dir.path()).unwrap();

        let target = Target::Post("abc123".to_string());
        writers
            .append(
                &target,
                &[Record {
                    text: "one".to_string(),
                }],
            )
            .unwrap();
        writers
            .append(
                &target,
                &[Record {
                    text: "two".to_string(),
                }],
            )
            .unwrap();
        writers.flush_all().unwrap();

        let content = std::fs::read_to_string(dir.path().join("abc123.txt")).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_empty_append_opens_nothing() {
        let dir = TempDir::new().unwrap();
        let mut writers = OutputSet::new(dir.path()).unwrap();

        let target = Target::Subreddit("quiet".to_string());
        let written = writers.append(&target, &[]).unwrap();
        assert_eq!(written, 0);
        assert!(!dir.path().join("quiet.txt").exists());
    }

    #[test]
    fn test_output_dir_created() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let writers = OutputSet::new(&nested).unwrap();
        assert!(nested.is_dir());
        drop(writers);
    }
}
