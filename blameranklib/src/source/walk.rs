//! Lazy discovery of eligible files under a root directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use walkdir::{DirEntry, WalkDir};

use super::filter::ExtensionFilter;
use crate::Result;

/// Directory holding repository internals; pruned together with its subtree.
pub const RESERVED_DIR: &str = ".git";

fn is_reserved_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == OsStr::new(RESERVED_DIR)
}

/// Walk `root` and yield every file that passes `filter`.
///
/// The walk is lazy and single-pass; call again for a fresh pass. Entries
/// that cannot be read are skipped and the walk carries on, so a missing
/// root simply yields nothing.
pub fn discover(
    root: impl AsRef<Path>,
    filter: &ExtensionFilter,
) -> impl Iterator<Item = PathBuf> {
    let filter = filter.clone();

    WalkDir::new(root.as_ref())
        .into_iter()
        .filter_entry(|e| !is_reserved_dir(e))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| !e.file_type().is_dir())
        .map(DirEntry::into_path)
        .filter(move |path| filter.matches(path))
}

/// Run [`discover`] on a dedicated thread, sending each path into `tx`.
///
/// The queue closes when the walk ends and `tx` is dropped. The returned
/// handle yields how many paths were sent.
pub fn spawn_discovery(
    root: PathBuf,
    filter: ExtensionFilter,
    tx: Sender<PathBuf>,
) -> Result<JoinHandle<usize>> {
    let handle = thread::Builder::new()
        .name("discovery".to_string())
        .spawn(move || {
            let mut sent = 0;
            for path in discover(&root, &filter) {
                tracing::trace!(path = %path.display(), "discovered");
                if tx.send(path).is_err() {
                    tracing::debug!("file queue closed, stopping discovery");
                    break;
                }
                sent += 1;
            }
            tracing::debug!(files = sent, root = %root.display(), "discovery finished");
            sent
        })?;

    Ok(handle)
}
