//! Plain-text rendering of the author ranking.
//!
//! ```text
//! author	lines	total	%
//! alice:	7	10.0	70.0%
//! bob:	3	10.0	30.0%
//!
//! ```

use crate::stats::{percentage, AuthorStats};

/// First line of every report.
pub const HEADER: &str = "author\tlines\ttotal\t%";

/// Render one report: header, one row per author, trailing blank line.
///
/// Rows are ordered by line count descending, then by author. A zero
/// `total` renders every share as `0.0%`.
pub fn render_rank(stats: &AuthorStats, total: u64) -> String {
    let mut out = String::with_capacity(HEADER.len() + 2 + stats.len() * 48);
    out.push_str(HEADER);
    out.push('\n');

    for (author, lines) in stats.ranked() {
        out.push_str(&format!(
            "{}:\t{}\t{:.1}\t{:.1}%\n",
            author,
            lines,
            total as f64,
            percentage(lines, total)
        ));
    }

    out.push('\n');
    out
}
