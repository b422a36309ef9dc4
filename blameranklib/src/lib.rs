//! # blameranklib
//!
//! Rank the authors of a git working copy by the lines they own at HEAD.
//!
//! ## Overview
//!
//! Every non-blank line of every eligible file is attributed to the author of
//! the commit that last touched it, as computed by `git blame`. Counts are
//! accumulated per author and printed as a ranking with each author's share
//! of the total.
//!
//! The work runs as a two-stage pipeline:
//!
//! - **Discovery**: one thread walks the tree, prunes `.git`, and keeps files
//!   whose extension is on the allow-list
//! - **Blame**: a fixed pool of workers blames files in parallel and pushes
//!   every attributed line onto one merged queue
//! - **Aggregation**: the calling thread drains that queue, drops blank
//!   lines, and writes a progress report every few lines plus a final one
//!
//! A file that cannot be blamed is reported and contributes nothing; it never
//! stops the run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blameranklib::{rank_authors, ExtensionFilter, RankOptions};
//!
//! let options = RankOptions::new()
//!     .extensions(ExtensionFilter::parse(".rs,.toml"))
//!     .workers(8);
//!
//! let result = rank_authors(".", options, &mut std::io::stdout()).unwrap();
//! for (author, lines) in result.stats.ranked() {
//!     println!("{author} owns {lines} of {} lines", result.total);
//! }
//! ```

pub mod aggregate;
pub mod error;
pub mod git;
pub mod pool;
pub mod rank;
pub mod report;
pub mod source;
pub mod stats;

pub use aggregate::{aggregate, Aggregator, Observed, Tally, DEFAULT_REPORT_EVERY};
pub use error::BlameRankError;
pub use git::{AuthorKey, Blame, GitBlamer, HeadCommit};
pub use pool::{BlameEvent, BlamePool, FileFailure, PoolSummary, DEFAULT_WORKERS};
pub use rank::{rank_authors, rank_with, RankOptions, RankResult};
pub use report::{render_rank, HEADER};
pub use source::{discover, ExtensionFilter, DEFAULT_EXTENSIONS};
pub use stats::{percentage, AttributedLine, AuthorStats};

/// Result type for blameranklib operations
pub type Result<T> = std::result::Result<T, BlameRankError>;
