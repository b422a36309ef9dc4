//! Git access: HEAD resolution and per-file blame.
//!
//! [`HeadCommit`] pins the snapshot every file is blamed against. It wraps a
//! [`gix::ThreadSafeRepository`] so a single handle can be shared by all
//! blame workers; each blame call converts it to a thread-local repository.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use gix::bstr::{BStr, BString, ByteSlice};

use crate::error::BlameRankError;
use crate::stats::AttributedLine;
use crate::Result;

/// Per-file line authorship.
///
/// Implementations must be shareable across worker threads. A failure means
/// the file contributes no lines; the caller moves on to the next file.
pub trait Blame: Send + Sync {
    /// Return one attributed line per line of `path`, in file order.
    fn blame(&self, path: &Path) -> Result<Vec<AttributedLine>>;
}

impl<B: Blame + ?Sized> Blame for Arc<B> {
    fn blame(&self, path: &Path) -> Result<Vec<AttributedLine>> {
        (**self).blame(path)
    }
}

/// Which part of the commit signature identifies an author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorKey {
    /// Signature email, e.g. `alice@example.com`
    #[default]
    Email,
    /// Signature name, e.g. `Alice Example`
    Name,
}

/// The HEAD commit of a repository, shareable across threads.
pub struct HeadCommit {
    repo: gix::ThreadSafeRepository,
    id: gix::ObjectId,
    workdir: PathBuf,
}

impl std::fmt::Debug for HeadCommit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadCommit")
            .field("id", &self.id)
            .field("workdir", &self.workdir)
            .finish()
    }
}

impl HeadCommit {
    /// Open the repository containing `path` and resolve its HEAD commit.
    ///
    /// `path` is made absolute first so discovery can climb above a relative
    /// root. `GIT_CEILING_DIRECTORIES` and `GIT_DISCOVERY_ACROSS_FILESYSTEM`
    /// bound the search as they do for `git`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |message: String| BlameRankError::RepositoryOpen {
            path: path.to_path_buf(),
            message,
        };

        let start = path.canonicalize().map_err(|e| open_error(e.to_string()))?;
        let repo = gix::ThreadSafeRepository::discover_with_environment_overrides(&start)
            .map_err(|e| open_error(e.to_string()))?
            .to_thread_local();

        let workdir = repo
            .workdir()
            .ok_or_else(|| open_error("repository has no work directory".to_string()))?
            .to_path_buf();
        let workdir = workdir.canonicalize().unwrap_or(workdir);

        let head_id = repo
            .head_id()
            .map_err(|e| BlameRankError::NoHead(e.to_string()))?
            .detach();

        let id = repo
            .find_commit(head_id)
            .map_err(|e| BlameRankError::NoCommit(e.to_string()))?
            .id;

        tracing::debug!(commit = %id, workdir = %workdir.display(), "resolved HEAD");

        Ok(Self {
            repo: repo.into_sync(),
            id,
            workdir,
        })
    }

    /// Id of the HEAD commit
    pub fn id(&self) -> gix::ObjectId {
        self.id
    }

    /// Canonical root of the work tree
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Map a discovered path to a `/`-separated path relative to the work tree.
    ///
    /// Only the parent directory is canonicalized so a symlinked file is
    /// looked up as itself rather than as its target.
    pub fn repo_relative(&self, path: &Path) -> Result<BString> {
        let not_in_repo = |message: String| BlameRankError::NotInRepository {
            path: path.to_path_buf(),
            message,
        };

        let file_name = path
            .file_name()
            .ok_or_else(|| not_in_repo("path has no file name".to_string()))?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let parent = parent
            .canonicalize()
            .map_err(|e| not_in_repo(e.to_string()))?;
        let absolute = parent.join(file_name);

        let relative = absolute
            .strip_prefix(&self.workdir)
            .map_err(|_| not_in_repo("path is outside of the work tree".to_string()))?;

        let mut out = BString::default();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                let part = part
                    .to_str()
                    .ok_or_else(|| not_in_repo("path is not valid UTF-8".to_string()))?;
                if !out.is_empty() {
                    out.push(b'/');
                }
                out.extend_from_slice(part.as_bytes());
            }
        }

        Ok(out)
    }
}

/// [`Blame`] backed by gitoxide, blaming at a fixed [`HeadCommit`].
#[derive(Debug, Clone)]
pub struct GitBlamer {
    head: Arc<HeadCommit>,
    key: AuthorKey,
}

impl GitBlamer {
    /// Create a blamer for `head`, identifying authors by `key`
    pub fn new(head: Arc<HeadCommit>, key: AuthorKey) -> Self {
        Self { head, key }
    }

    fn author_of(
        &self,
        repo: &gix::Repository,
        id: gix::ObjectId,
    ) -> std::result::Result<String, String> {
        let commit = repo
            .find_commit(id)
            .map_err(|e| format!("failed to find commit {}: {}", id, e))?;
        let signature = commit
            .author()
            .map_err(|e| format!("failed to decode author of {}: {}", id, e))?;

        Ok(match self.key {
            AuthorKey::Name => signature.name.to_string(),
            AuthorKey::Email => signature.email.to_string(),
        })
    }
}

impl Blame for GitBlamer {
    fn blame(&self, path: &Path) -> Result<Vec<AttributedLine>> {
        let not_in_repo = |message: String| BlameRankError::NotInRepository {
            path: path.to_path_buf(),
            message,
        };

        let relative = self.head.repo_relative(path)?;
        let repo = self.head.repo.to_thread_local();

        let mut resource_cache = repo
            .diff_resource_cache_for_tree_diff()
            .map_err(|e| not_in_repo(e.to_string()))?;
        let outcome = gix::blame::file(
            &repo.objects,
            self.head.id,
            None,
            &mut resource_cache,
            relative.as_bstr(),
            Default::default(),
        )
        .map_err(|e| not_in_repo(e.to_string()))?;

        let mut authors: HashMap<gix::ObjectId, String> = HashMap::new();
        let mut lines = Vec::new();

        for (entry, hunk) in outcome.entries_with_lines() {
            let author = match authors.get(&entry.commit_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.author_of(&repo, entry.commit_id).map_err(not_in_repo)?;
                    authors.insert(entry.commit_id, author.clone());
                    author
                }
            };

            for text in hunk {
                lines.push(AttributedLine::new(
                    author.clone(),
                    strip_line_ending(text.as_bstr()),
                ));
            }
        }

        tracing::trace!(
            path = %path.display(),
            lines = lines.len(),
            commits = authors.len(),
            "blamed"
        );

        Ok(lines)
    }
}

/// Line content as text, with a trailing `\n` or `\r\n` removed.
fn strip_line_ending(line: &BStr) -> String {
    let bytes: &[u8] = line.as_ref();
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    bytes.to_str_lossy().into_owned()
}
