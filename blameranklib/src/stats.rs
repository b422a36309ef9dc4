//! Core data structures for line ownership statistics

use std::collections::HashMap;

/// A single line of a blamed file, tagged with the author who last touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributedLine {
    /// Author identifier as recorded in the commit signature
    pub author: String,
    /// Raw line content, without the line terminator
    pub text: String,
}

impl AttributedLine {
    /// Create a new attributed line
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    /// Whether the line is empty or holds only ASCII space, tab, CR, LF
    /// or form feed.
    pub fn is_blank(&self) -> bool {
        self.text
            .trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c'))
            .is_empty()
    }
}

/// Line counts per author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorStats {
    counts: HashMap<String, u64>,
}

impl AuthorStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one line to `author`.
    pub fn record(&mut self, author: &str) {
        match self.counts.get_mut(author) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(author.to_string(), 1);
            }
        }
    }

    /// Lines credited to `author`, zero if unknown.
    pub fn get(&self, author: &str) -> u64 {
        self.counts.get(author).copied().unwrap_or(0)
    }

    /// Number of distinct authors
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no line has been credited yet
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all author counts
    pub fn sum(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate over `(author, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(a, c)| (a.as_str(), *c))
    }

    /// Authors ordered by line count descending, ties broken by name.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<(&str, u64)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}

impl<'a> FromIterator<(&'a str, u64)> for AuthorStats {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut stats = AuthorStats::new();
        for (author, count) in iter {
            *stats.counts.entry(author.to_string()).or_insert(0) += count;
        }
        stats
    }
}

/// Share of `count` in `total` as a percentage; zero when `total` is zero.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines() {
        assert!(AttributedLine::new("a", "").is_blank());
        assert!(AttributedLine::new("a", "   ").is_blank());
        assert!(AttributedLine::new("a", "\t \t").is_blank());
        assert!(AttributedLine::new("a", "\r").is_blank());
        assert!(!AttributedLine::new("a", "  end").is_blank());
        assert!(!AttributedLine::new("a", "}").is_blank());
    }

    #[test]
    fn test_blank_is_ascii_whitespace_only() {
        assert!(AttributedLine::new("a", " \x0c\n").is_blank());
        assert!(!AttributedLine::new("a", "\u{a0}").is_blank());
        assert!(!AttributedLine::new("a", "\x0b").is_blank());
        assert!(!AttributedLine::new("a", " \u{2003} ").is_blank());
    }

    #[test]
    fn test_record_and_sum() {
        let mut stats = AuthorStats::new();
        stats.record("alice");
        stats.record("bob");
        stats.record("alice");

        assert_eq!(stats.get("alice"), 2);
        assert_eq!(stats.get("bob"), 1);
        assert_eq!(stats.get("carol"), 0);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.sum(), 3);
    }

    #[test]
    fn test_ranked_order() {
        let stats: AuthorStats = [("bob", 3), ("alice", 7), ("carol", 3)]
            .into_iter()
            .collect();

        assert_eq!(
            stats.ranked(),
            vec![("alice", 7), ("bob", 3), ("carol", 3)]
        );
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(7, 10), 70.0);
        assert_eq!(percentage(3, 10), 30.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
