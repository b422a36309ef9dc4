//! Single-consumer aggregation of attributed lines.
//!
//! All counting happens on the thread that drains the merged queue, so
//! [`AuthorStats`] needs no locking and `stats.sum() == total` holds after
//! every observed line.

use std::io::Write;

use crate::pool::BlameEvent;
use crate::report::render_rank;
use crate::stats::{AttributedLine, AuthorStats};
use crate::Result;

/// Progress report cadence, in non-blank lines, when none is configured.
pub const DEFAULT_REPORT_EVERY: u64 = 10;

/// What [`Aggregator::observe`] did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// Empty or whitespace only; not counted
    Blank,
    /// Counted
    Counted,
    /// Counted, and a progress report is due
    ReportDue,
}

/// Running per-author line counts.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    stats: AuthorStats,
    total: u64,
    report_every: u64,
}

impl Aggregator {
    /// Create an aggregator asking for a progress report every
    /// `report_every` non-blank lines; zero never asks.
    pub fn new(report_every: u64) -> Self {
        Self {
            stats: AuthorStats::new(),
            total: 0,
            report_every,
        }
    }

    /// Count one line unless it is blank.
    pub fn observe(&mut self, line: &AttributedLine) -> Observed {
        if line.is_blank() {
            return Observed::Blank;
        }

        self.stats.record(&line.author);
        self.total += 1;

        if self.report_every != 0 && self.total % self.report_every == 0 {
            Observed::ReportDue
        } else {
            Observed::Counted
        }
    }

    /// Current per-author counts
    pub fn stats(&self) -> &AuthorStats {
        &self.stats
    }

    /// Non-blank lines counted so far
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Render the current ranking
    pub fn render(&self) -> String {
        render_rank(&self.stats, self.total)
    }
}

/// Outcome of draining the merged queue.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    /// Lines per author
    pub stats: AuthorStats,
    /// Non-blank lines counted
    pub total: u64,
    /// Blank lines discarded
    pub blank: u64,
    /// Files reported as not blameable
    pub files_failed: u64,
    /// Reports written, the final one included
    pub reports: u64,
}

/// Drain `events`, writing progress reports, failures and the final report to `out`.
///
/// The final report is written exactly once after `events` is exhausted,
/// even when nothing was counted.
pub fn aggregate<I, W>(events: I, report_every: u64, out: &mut W) -> Result<Tally>
where
    I: IntoIterator<Item = BlameEvent>,
    W: Write + ?Sized,
{
    let mut aggregator = Aggregator::new(report_every);
    let mut tally = Tally::default();

    for event in events {
        match event {
            BlameEvent::Line(line) => match aggregator.observe(&line) {
                Observed::Blank => tally.blank += 1,
                Observed::Counted => {}
                Observed::ReportDue => {
                    out.write_all(aggregator.render().as_bytes())?;
                    tally.reports += 1;
                }
            },
            BlameEvent::Failed(failure) => {
                tally.files_failed += 1;
                writeln!(
                    out,
                    "file {} is not in the repository: {}",
                    failure.path.display(),
                    failure.error.detail()
                )?;
            }
        }
    }

    out.write_all(aggregator.render().as_bytes())?;
    out.flush()?;
    tally.reports += 1;

    tally.stats = aggregator.stats;
    tally.total = aggregator.total;
    Ok(tally)
}
