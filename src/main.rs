//! Reddit-Harvester main entry point
//!
//! This is the command-line interface for the Reddit-Harvester fetcher.

use anyhow::Context;
use chrono::{Days, NaiveDate};
use clap::Parser;
use reddit_harvester::client::{RedditClient, RetryPolicy, SearchClient};
use reddit_harvester::config::load_config;
use reddit_harvester::output::print_summary;
use reddit_harvester::window::WindowError;
use reddit_harvester::{build_tasks, source, windows, Blacklist, Dispatcher};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reddit-Harvester: a date-windowed Reddit submission fetcher
///
/// Fetches Reddit submissions for a date range and writes their cleaned
/// text to one file per target. Use --subs to fetch subreddits, --posts to
/// fetch individual submissions, and --config for raw search-API queries.
#[derive(Parser, Debug)]
#[command(name = "reddit-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Fetches Reddit submissions into plain text files", long_about = None)]
#[command(group = clap::ArgGroup::new("mode").required(true).args(["subs", "posts", "config"]))]
struct Cli {
    /// File listing subreddits to fetch, one per line
    #[arg(long, value_name = "FILE")]
    subs: Option<PathBuf>,

    /// File listing post IDs to fetch, one per line
    #[arg(long, value_name = "FILE")]
    posts: Option<PathBuf>,

    /// File of raw search-API parameters, one key<TAB>value pair per line
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (created if missing), one text file per target
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// First date to fetch, inclusive
    #[arg(long, value_name = "YYYY-MM-DD")]
    start: NaiveDate,

    /// Last date to fetch, inclusive
    #[arg(long, value_name = "YYYY-MM-DD")]
    end: NaiveDate,

    /// File of substrings; output lines containing any of them are dropped
    #[arg(long, value_name = "FILE")]
    blacklist: Option<PathBuf>,

    /// Number of parallel workers (default: available CPUs)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// TOML file with API credentials and optional tuning
    #[arg(long, value_name = "FILE", default_value = "credentials.toml")]
    credentials: PathBuf,

    /// Sort each target's output by window start instead of completion order
    #[arg(long)]
    chronological: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // The CLI range is inclusive on both ends; everything downstream works
    // on half-open windows.
    if cli.start > cli.end {
        return Err(WindowError::InvalidRange {
            start: cli.start,
            end: cli.end,
        }
        .into());
    }
    let end_exclusive = cli
        .end
        .checked_add_days(Days::new(1))
        .context("end date out of range")?;

    // Load and validate credentials before anything touches the network
    tracing::info!("Loading credentials from: {}", cli.credentials.display());
    let config = load_config(&cli.credentials)
        .with_context(|| format!("failed to load {}", cli.credentials.display()))?;

    // Resolve targets and the blacklist
    let targets = source::resolve(
        cli.subs.as_deref(),
        cli.posts.as_deref(),
        cli.config.as_deref(),
    )?;
    tracing::info!("Resolved {} targets", targets.len());

    let blacklist = Blacklist::load(cli.blacklist.as_deref())
        .context("failed to load blacklist")?;
    if !blacklist.is_empty() {
        tracing::info!("Blacklist loaded with {} entries", blacklist.len());
    }

    // Build the task queue: targets x date windows
    let window_iter = windows(cli.start, end_exclusive, config.fetch.window_days)?;
    let tasks = build_tasks(&targets, window_iter);
    tracing::info!(
        "Fetching {} to {} in {} tasks",
        cli.start,
        cli.end,
        tasks.len()
    );

    let workers = cli.workers.unwrap_or_else(default_workers);

    let client = SearchClient::new(&config.credentials)?;

    // Log in before dispatching anything; bad credentials fail fast
    tracing::info!("Authenticating with the Reddit API");
    let reddit = RedditClient::authenticate(&config.credentials)
        .await
        .context("Reddit API login failed; check client-id and client-secret")?;

    let policy = RetryPolicy::new(&config.retry);
    let dispatcher = Dispatcher::new(
        client,
        reddit,
        policy,
        blacklist,
        config.fetch.clone(),
        workers,
        cli.chronological,
    );

    let summary = dispatcher.run(tasks, &cli.output).await?;
    print_summary(&summary);

    if !summary.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Default worker count: the number of available processing units
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reddit_harvester=info,warn"),
            1 => EnvFilter::new("reddit_harvester=debug,info"),
            2 => EnvFilter::new("reddit_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
