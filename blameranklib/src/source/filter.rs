//! Extension allow-list filtering.
//!
//! A path is eligible when its extension, taken as everything from the last
//! `.` of the final path segment, equals one of the configured entries
//! exactly. Entries are compared verbatim: no trimming, no case folding.

use std::path::Path;

/// Extensions analyzed when none are given.
pub const DEFAULT_EXTENSIONS: &str = ".rb,.js,.css,.html,.haml,.erb";

/// Allow-list of dot-prefixed extension suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::parse(DEFAULT_EXTENSIONS)
    }
}

impl ExtensionFilter {
    /// Create a filter from explicit entries.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as `.rb,.js`.
    ///
    /// Entries are kept as written, so `".rb, .js"` yields the entry `" .js"`
    /// which matches nothing.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// The configured entries.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Check if a path is eligible for analysis.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = extension_of(path);
        self.extensions.iter().any(|e| e == ext)
    }
}

/// Extension of the final path segment, including the leading dot.
///
/// Returns an empty string when the segment has no dot. Unlike
/// [`Path::extension`], a dotfile such as `.bashrc` is its own extension.
pub fn extension_of(path: &Path) -> &str {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return "",
    };

    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}
