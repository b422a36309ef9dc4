//! Error types for blameranklib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while ranking authors
#[derive(Error, Debug)]
pub enum BlameRankError {
    /// No git repository could be opened at or above the path
    #[error("could not open repository {path}: {message}")]
    RepositoryOpen { path: PathBuf, message: String },

    /// HEAD could not be resolved (unborn branch, broken ref)
    #[error("could not get HEAD: {0}")]
    NoHead(String),

    /// HEAD does not point at a readable commit
    #[error("could not get HEAD commit: {0}")]
    NoCommit(String),

    /// A file could not be blamed in the HEAD snapshot
    #[error("file {path} is not in the repository: {message}")]
    NotInRepository { path: PathBuf, message: String },

    /// The worker pool needs at least one worker
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    /// A blame worker panicked
    #[error("blame worker {0} panicked")]
    WorkerPanicked(usize),

    /// The discovery thread panicked
    #[error("file discovery panicked")]
    DiscoveryPanicked,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlameRankError {
    /// Detail of a per-file failure, without the path prefix.
    pub fn detail(&self) -> String {
        match self {
            BlameRankError::NotInRepository { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
