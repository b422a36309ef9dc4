//! Repository discovery from relative roots and from outside any checkout.
//!
//! These tests change the working directory or the environment of the test
//! process, so they hold a lock while they run.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::{Mutex, MutexGuard};

use blameranklib::{rank_authors, BlameRankError, ExtensionFilter, HeadCommit, RankOptions};
use tempfile::tempdir;

static PROCESS_STATE: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    PROCESS_STATE.lock().unwrap_or_else(|e| e.into_inner())
}

/// Run git in `dir`; `None` when git is not installed.
fn git(dir: &Path, args: &[&str]) -> Option<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .output()
        .ok()?;
    assert!(output.status.success(), "git {:?} failed: {:?}", args, output);
    Some(())
}

#[test]
fn test_relative_subdirectory_root() {
    let _guard = lock();
    let temp = tempdir().unwrap();
    let root = temp.path();

    if git(root, &["init", "-q"]).is_none() {
        return;
    }
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("app/x.js"), "var x = 1;\nexport default x;\n").unwrap();
    git(root, &["add", "-A"]).unwrap();
    git(
        root,
        &[
            "-c",
            "user.name=bob",
            "-c",
            "user.email=bob@example.com",
            "commit",
            "-q",
            "-m",
            "add x",
        ],
    )
    .unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(root).unwrap();

    let head = HeadCommit::open("app");
    let mut out = Vec::new();
    let options = RankOptions::new().extensions(ExtensionFilter::parse(".js"));
    let ranked = rank_authors("app", options, &mut out);

    env::set_current_dir(previous).unwrap();

    let head = head.unwrap();
    assert_eq!(head.workdir(), root.canonicalize().unwrap());

    let result = ranked.unwrap();
    assert_eq!(result.total, 2);
    assert_eq!(result.files_failed, 0);
    assert_eq!(result.stats.get("bob@example.com"), 2);
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("bob@example.com:\t2\t2.0\t100.0%\n"));
}

#[test]
fn test_outside_any_repository() {
    let _guard = lock();
    let temp = tempdir().unwrap();
    let dir = temp.path().canonicalize().unwrap();
    fs::write(dir.join("a.rb"), "puts 1\n").unwrap();
    let ceiling = dir.parent().unwrap().to_path_buf();

    env::set_var("GIT_CEILING_DIRECTORIES", &ceiling);

    let opened = HeadCommit::open(&dir);
    let mut out = Vec::new();
    let ranked = rank_authors(&dir, RankOptions::new(), &mut out);

    env::remove_var("GIT_CEILING_DIRECTORIES");

    assert!(matches!(opened, Err(BlameRankError::RepositoryOpen { .. })));
    assert!(matches!(ranked, Err(BlameRankError::RepositoryOpen { .. })));
    assert!(out.is_empty());
}
