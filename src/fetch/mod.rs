//! Fetch tasks and the worker pool dispatcher
//!
//! A task is one (target, date window) pair. The dispatcher runs the full
//! cross product of targets and windows across a bounded number of
//! concurrent workers and hands completed results to the output writer.

mod pool;
mod task;

pub use pool::{Dispatcher, FailedTask, RunSummary};
pub use task::{build_tasks, FetchError, FetchTask, Record, TaskOutput};
