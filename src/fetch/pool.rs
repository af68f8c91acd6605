//! Worker pool dispatcher
//!
//! Runs up to N fetch tasks concurrently and appends each completed task's
//! records to its target's output file. By default records are written in
//! task-completion order; chronological mode buffers every result and sorts
//! each target's output by window start before writing.
//!
//! On Ctrl-C the remaining tasks are abandoned, but all open output files
//! are flushed and closed before the summary is returned.

use crate::client::{RedditClient, RetryPolicy, SearchClient};
use crate::config::FetchConfig;
use crate::fetch::task::{FetchTask, Record};
use crate::filter::Blacklist;
use crate::output::OutputSet;
use crate::source::Target;
use crate::text::TextCleaner;
use crate::window::DateWindow;
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// One task that exhausted its retries
#[derive(Debug, Clone)]
pub struct FailedTask {
    pub target: String,
    pub window: DateWindow,
    pub error: String,
}

/// Final accounting for a run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tasks_succeeded: u64,
    pub tasks_failed: u64,
    pub records_written: u64,
    pub lines_filtered: u64,
    pub interrupted: bool,
    pub failures: Vec<FailedTask>,
}

impl RunSummary {
    /// True when every task completed and the run was not interrupted
    pub fn is_success(&self) -> bool {
        self.tasks_failed == 0 && !self.interrupted
    }
}

/// Distributes fetch tasks across a bounded pool of workers
pub struct Dispatcher {
    client: SearchClient,
    reddit: RedditClient,
    policy: RetryPolicy,
    cleaner: TextCleaner,
    blacklist: Arc<Blacklist>,
    options: FetchConfig,
    workers: usize,
    chronological: bool,
}

impl Dispatcher {
    pub fn new(
        client: SearchClient,
        reddit: RedditClient,
        policy: RetryPolicy,
        blacklist: Blacklist,
        options: FetchConfig,
        workers: usize,
        chronological: bool,
    ) -> Self {
        Self {
            client,
            reddit,
            policy,
            cleaner: TextCleaner::new(),
            blacklist: Arc::new(blacklist),
            options,
            workers: workers.max(1),
            chronological,
        }
    }

    /// Runs all tasks and writes their records under `output_dir`
    ///
    /// Partial failure is non-fatal: tasks that exhaust their retries are
    /// recorded in the summary and the rest of the run continues. Ctrl-C
    /// abandons the remaining tasks, flushes the output files, and returns
    /// the summary with `interrupted` set.
    pub async fn run(
        &self,
        tasks: Vec<FetchTask>,
        output_dir: &Path,
    ) -> Result<RunSummary, HarvestError> {
        self.run_until(tasks, output_dir, async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; run to completion instead
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Like [`run`](Self::run), but with an explicit shutdown trigger
    ///
    /// When `shutdown` resolves, the remaining tasks are abandoned and all
    /// open output files are flushed and closed before the summary is
    /// returned.
    pub async fn run_until<S>(
        &self,
        tasks: Vec<FetchTask>,
        output_dir: &Path,
        shutdown: S,
    ) -> Result<RunSummary, HarvestError>
    where
        S: Future<Output = ()>,
    {
        let total = tasks.len();
        tracing::info!(
            "Dispatching {} tasks across {} workers",
            total,
            self.workers
        );

        let mut writers = OutputSet::new(output_dir)?;
        let mut summary = RunSummary::default();
        let mut buffered: Vec<(Target, DateWindow, Vec<Record>)> = Vec::new();

        let mut results = stream::iter(tasks.into_iter().map(|task| {
            let client = self.client.clone();
            let reddit = self.reddit.clone();
            let policy = self.policy.clone();
            let cleaner = self.cleaner.clone();
            let blacklist = self.blacklist.clone();
            let options = self.options.clone();
            async move {
                let result = task
                    .run(&client, &reddit, &policy, &cleaner, &blacklist, &options)
                    .await;
                (task, result)
            }
        }))
        .buffer_unordered(self.workers);

        tokio::pin!(shutdown);

        let mut completed = 0usize;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::warn!("Interrupted; abandoning remaining tasks and flushing output");
                    summary.interrupted = true;
                    break;
                }
                next = results.next() => {
                    let Some((task, result)) = next else {
                        break;
                    };
                    completed += 1;

                    match result {
                        Ok(output) => {
                            summary.tasks_succeeded += 1;
                            summary.lines_filtered += output.filtered;

                            if self.chronological {
                                buffered.push((task.target, task.window, output.records));
                            } else {
                                summary.records_written +=
                                    writers.append(&task.target, &output.records)?;
                            }
                        }
                        Err(e) => {
                            tracing::error!("Task failed: {}", e);
                            summary.tasks_failed += 1;
                            summary.failures.push(FailedTask {
                                target: e.target.clone(),
                                window: e.window,
                                error: e.source.to_string(),
                            });
                        }
                    }

                    if completed % 10 == 0 {
                        tracing::info!("Progress: {} of {} tasks completed", completed, total);
                    }
                }
            }
        }

        // Chronological mode defers all writes until every window is in
        if self.chronological {
            buffered.sort_by_cached_key(|(target, window, _)| (target.file_stem(), window.start));
            for (target, _, records) in &buffered {
                summary.records_written += writers.append(target, records)?;
            }
        }

        writers.flush_all()?;

        tracing::info!(
            "Run finished: {} succeeded, {} failed, {} records written, {} lines filtered",
            summary.tasks_succeeded,
            summary.tasks_failed,
            summary.records_written,
            summary.lines_filtered
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_success_condition() {
        let mut summary = RunSummary::default();
        assert!(summary.is_success());

        summary.tasks_failed = 1;
        assert!(!summary.is_success());

        summary.tasks_failed = 0;
        summary.interrupted = true;
        assert!(!summary.is_success());
    }
}
