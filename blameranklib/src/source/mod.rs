//! Source discovery: find files to blame.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **Extension filtering**: exact-suffix allow-list of file extensions
//! - **Tree walking**: lazy traversal that prunes `.git` and skips unreadable entries
//!
//! ## Example
//!
//! ```rust,ignore
//! use blameranklib::source::{discover, ExtensionFilter};
//!
//! let filter = ExtensionFilter::parse(".rb,.erb");
//! for path in discover(".", &filter) {
//!     println!("{}", path.display());
//! }
//! ```

pub mod filter;
pub mod walk;

pub use filter::{extension_of, ExtensionFilter, DEFAULT_EXTENSIONS};
pub use walk::{discover, spawn_discovery, RESERVED_DIR};
