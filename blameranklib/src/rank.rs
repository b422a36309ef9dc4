//! High-level ranking API.
//!
//! This module wires the pipeline together: a discovery thread feeds the
//! blame pool, whose merged output is aggregated on the calling thread.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::aggregate::{aggregate, DEFAULT_REPORT_EVERY};
use crate::error::BlameRankError;
use crate::git::{AuthorKey, Blame, GitBlamer, HeadCommit};
use crate::pool::{BlamePool, DEFAULT_WORKERS};
use crate::source::{spawn_discovery, ExtensionFilter};
use crate::stats::AuthorStats;
use crate::Result;

/// Options for ranking authors.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Which files are eligible
    pub extensions: ExtensionFilter,
    /// Number of blame workers
    pub workers: usize,
    /// Non-blank lines between progress reports (0 = final report only)
    pub report_every: u64,
    /// Capacity of the file and line queues (0 = rendezvous)
    pub queue_capacity: usize,
    /// How authors are identified
    pub author_key: AuthorKey,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            extensions: ExtensionFilter::default(),
            workers: DEFAULT_WORKERS,
            report_every: DEFAULT_REPORT_EVERY,
            queue_capacity: 0,
            author_key: AuthorKey::Email,
        }
    }
}

impl RankOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extension allow-list.
    pub fn extensions(mut self, filter: ExtensionFilter) -> Self {
        self.extensions = filter;
        self
    }

    /// Set the number of blame workers.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the progress report cadence.
    pub fn report_every(mut self, lines: u64) -> Self {
        self.report_every = lines;
        self
    }

    /// Set the capacity of the internal queues.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Identify authors by signature name instead of email.
    pub fn by_name(mut self) -> Self {
        self.author_key = AuthorKey::Name;
        self
    }
}

/// Result of a full ranking run.
#[derive(Debug, Clone, Default)]
pub struct RankResult {
    /// Lines per author
    pub stats: AuthorStats,
    /// Non-blank lines counted
    pub total: u64,
    /// Eligible files found by discovery
    pub files_discovered: u64,
    /// Files blamed successfully
    pub files_blamed: u64,
    /// Files that could not be blamed
    pub files_failed: u64,
    /// Reports written, the final one included
    pub reports: u64,
}

/// Rank authors of the files under `path` by lines owned at HEAD.
///
/// The repository is discovered from `path`. Reports and per-file failures
/// are written to `out` as the run progresses.
///
/// # Example
///
/// ```rust,ignore
/// use blameranklib::{rank_authors, ExtensionFilter, RankOptions};
///
/// let options = RankOptions::new().extensions(ExtensionFilter::parse(".rs"));
/// let result = rank_authors(".", options, &mut std::io::stdout())?;
/// println!("{} lines by {} authors", result.total, result.stats.len());
/// ```
pub fn rank_authors<W>(path: impl AsRef<Path>, options: RankOptions, out: &mut W) -> Result<RankResult>
where
    W: Write + ?Sized,
{
    let path = path.as_ref();

    if options.workers == 0 {
        return Err(BlameRankError::InvalidWorkerCount(0));
    }

    let head = Arc::new(HeadCommit::open(path)?);
    let blamer = Arc::new(GitBlamer::new(head, options.author_key));

    rank_with(blamer, path, &options, out)
}

/// Run the pipeline over `path` with any [`Blame`] implementation.
pub fn rank_with<B, W>(
    blamer: Arc<B>,
    path: impl AsRef<Path>,
    options: &RankOptions,
    out: &mut W,
) -> Result<RankResult>
where
    B: Blame + ?Sized + 'static,
    W: Write + ?Sized,
{
    let (file_tx, file_rx) = crossbeam_channel::bounded(options.queue_capacity);

    let pool = BlamePool::spawn(blamer, file_rx, options.workers, options.queue_capacity)?;
    let discovery = spawn_discovery(
        path.as_ref().to_path_buf(),
        options.extensions.clone(),
        file_tx,
    )?;

    let tally = aggregate(pool.events(), options.report_every, out)?;

    let pool_summary = pool.join()?;
    let files_discovered = discovery
        .join()
        .map_err(|_| BlameRankError::DiscoveryPanicked)?;

    tracing::info!(
        files = files_discovered,
        failed = tally.files_failed,
        lines = tally.total,
        blank = tally.blank,
        authors = tally.stats.len(),
        "ranking complete"
    );

    Ok(RankResult {
        stats: tally.stats,
        total: tally.total,
        files_discovered: files_discovered as u64,
        files_blamed: pool_summary.files_blamed,
        files_failed: tally.files_failed,
        reports: tally.reports,
    })
}
