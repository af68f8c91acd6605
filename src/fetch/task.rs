//! A single fetch task: one target paged through one date window
//!
//! Tasks perform no disk I/O. They page through the search API, pull each
//! kept submission's comment tree, clean everything into lines, drop
//! blacklisted lines, and return the surviving records to the dispatcher.

use crate::client::{ApiError, RedditClient, RetryPolicy, SearchClient, SearchItem};
use crate::config::FetchConfig;
use crate::filter::Blacklist;
use crate::source::Target;
use crate::text::TextCleaner;
use crate::window::{DateWindow, DateWindows};
use thiserror::Error;

/// A fetch that exhausted its retries, tagged with its task
#[derive(Debug, Error)]
#[error("{target} {window}: {source}")]
pub struct FetchError {
    pub target: String,
    pub window: DateWindow,
    #[source]
    pub source: ApiError,
}

/// One cleaned line of fetched text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
}

/// What a completed task hands back to the dispatcher
#[derive(Debug)]
pub struct TaskOutput {
    /// Cleaned lines that survived the blacklist
    pub records: Vec<Record>,
    /// Lines dropped by the blacklist
    pub filtered: u64,
    /// Pages fetched from the API
    pub pages: u32,
}

/// The pairing of one target with one date window
#[derive(Debug, Clone)]
pub struct FetchTask {
    pub target: Target,
    pub window: DateWindow,
}

/// Builds the full Cartesian product of targets and windows
pub fn build_tasks(targets: &[Target], windows: DateWindows) -> Vec<FetchTask> {
    let mut tasks = Vec::new();
    for target in targets {
        for window in windows.clone() {
            tasks.push(FetchTask {
                target: target.clone(),
                window,
            });
        }
    }
    tasks
}

impl FetchTask {
    /// Pages through the window and returns the cleaned, filtered records
    ///
    /// The search API returns results newest-first, so pagination moves the
    /// `before` cursor down to the smallest `created_utc` seen on each page.
    /// Iteration stops on an empty page, when the cursor reaches the window
    /// start, or at the `max-pages` safety cap.
    ///
    /// When `scrape-comments` is enabled, each kept submission's comment
    /// tree is fetched through the authenticated client and its bodies are
    /// cleaned into lines after the submission's own text. A submission
    /// whose comments cannot be fetched within the retry budget is skipped
    /// with a warning; the task itself keeps going.
    pub async fn run(
        &self,
        client: &SearchClient,
        reddit: &RedditClient,
        policy: &RetryPolicy,
        cleaner: &TextCleaner,
        blacklist: &Blacklist,
        options: &FetchConfig,
    ) -> Result<TaskOutput, FetchError> {
        let label = format!("{} {}", self.target.label(), self.window);
        let params = self.target.params();
        let after = self.window.start_timestamp();
        let mut before = self.window.end_timestamp();

        let mut records = Vec::new();
        let mut filtered = 0u64;
        let mut pages = 0u32;

        while before > after && pages < options.max_pages {
            let items = policy
                .run(&label, || client.search(&params, after, before))
                .await
                .map_err(|source| FetchError {
                    target: self.target.label(),
                    window: self.window,
                    source,
                })?;

            if items.is_empty() {
                break;
            }
            pages += 1;

            let mut oldest = before;
            for item in &items {
                oldest = oldest.min(item.created_utc);

                if should_skip(item, options) {
                    tracing::debug!("{}: skipping deleted/removed submission {}", label, item.id);
                    continue;
                }

                let mut lines = cleaner.clean(
                    item.title.as_deref(),
                    item.selftext.as_deref(),
                    item.author.as_deref(),
                    options.print_users,
                );

                if options.scrape_comments {
                    match policy
                        .run(&label, || reddit.comment_bodies(&item.id))
                        .await
                    {
                        Ok(comments) => {
                            for comment in &comments {
                                lines.extend(cleaner.clean(
                                    None,
                                    Some(comment.body.as_str()),
                                    comment.author.as_deref(),
                                    options.print_users,
                                ));
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                "{}: comments for {} unavailable ({}), skipping submission",
                                label,
                                item.id,
                                e
                            );
                            continue;
                        }
                    }
                }

                for line in lines {
                    if blacklist.matches(&line) {
                        filtered += 1;
                    } else {
                        records.push(Record { text: line });
                    }
                }
            }

            // A page that makes no cursor progress would loop forever
            if oldest >= before {
                break;
            }
            before = oldest;
        }

        tracing::debug!(
            "{}: {} records, {} filtered, {} pages",
            label,
            records.len(),
            filtered,
            pages
        );

        Ok(TaskOutput {
            records,
            filtered,
            pages,
        })
    }
}

/// True if the submission should be dropped before cleanup
fn should_skip(item: &SearchItem, options: &FetchConfig) -> bool {
    let body = item.selftext.as_deref().unwrap_or("");
    if options.skip_deleted && body.contains("[deleted]") {
        return true;
    }
    if options.skip_removed && body.contains("[removed]") {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::windows;

    fn date(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_cross_product_size() {
        let targets = vec![
            Target::Subreddit("a".to_string()),
            Target::Subreddit("b".to_string()),
            Target::Subreddit("c".to_string()),
        ];
        let windows = windows(date("2018-01-01"), date("2018-01-06"), 1).unwrap();

        let tasks = build_tasks(&targets, windows);
        assert_eq!(tasks.len(), 15);

        // Every target covers the full range exactly once
        let for_a: Vec<_> = tasks
            .iter()
            .filter(|t| t.target == targets[0])
            .map(|t| t.window)
            .collect();
        assert_eq!(for_a.len(), 5);
        assert_eq!(for_a[0].start, date("2018-01-01"));
        assert_eq!(for_a.last().unwrap().end, date("2018-01-06"));
    }

    #[test]
    fn test_should_skip_deleted_and_removed() {
        let options = FetchConfig::default();
        let item = SearchItem {
            id: "x".to_string(),
            created_utc: 0,
            subreddit: None,
            author: None,
            title: Some("t".to_string()),
            selftext: Some("[deleted]".to_string()),
        };
        assert!(should_skip(&item, &options));

        let removed = SearchItem {
            selftext: Some("[removed]".to_string()),
            ..item.clone()
        };
        assert!(should_skip(&removed, &options));

        let kept = SearchItem {
            selftext: Some("actual text".to_string()),
            ..item.clone()
        };
        assert!(!should_skip(&kept, &options));

        let mut keep_all = FetchConfig::default();
        keep_all.skip_deleted = false;
        keep_all.skip_removed = false;
        assert!(!should_skip(&item, &keep_all));
    }
}
