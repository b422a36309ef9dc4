//! # blamerank
//!
//! A CLI tool that ranks the authors of a git working copy by the lines they
//! own at HEAD.
//!
//! ## Overview
//!
//! blamerank is built on top of blameranklib. It walks the source tree,
//! blames every eligible file in parallel, and prints a running ranking every
//! ten non-blank lines followed by a final one.
//!
//! ## Usage
//!
//! ```bash
//! # Rank authors of the default web extensions under the current directory
//! blamerank
//!
//! # Rank authors of Rust sources in a subdirectory
//! blamerank --source crates/core --extensions .rs
//!
//! # Eight workers, final report only, authors by name
//! blamerank -j 8 --every 0 --name
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use blameranklib::{
    rank_authors, ExtensionFilter, RankOptions, DEFAULT_EXTENSIONS, DEFAULT_REPORT_EVERY,
    DEFAULT_WORKERS,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("blamerank")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Rank authors by the lines they own at HEAD, using git blame")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Root directory to scan"),
        )
        .arg(
            Arg::new("extensions")
                .short('e')
                .long("extensions")
                .default_value(DEFAULT_EXTENSIONS)
                .help("Comma-separated file extensions to include, with leading dots"),
        )
        .arg(
            Arg::new("workers")
                .short('j')
                .long("workers")
                .default_value(DEFAULT_WORKERS.to_string())
                .value_parser(value_parser!(usize))
                .help("Number of files blamed in parallel"),
        )
        .arg(
            Arg::new("every")
                .long("every")
                .default_value(DEFAULT_REPORT_EVERY.to_string())
                .value_parser(value_parser!(u64))
                .help("Print a progress ranking every N counted lines (0 for final only)"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .action(ArgAction::SetTrue)
                .help("Identify authors by name instead of email"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log pipeline activity to stderr"),
        )
}

/// Initialize tracing subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build rank options from matches
fn build_options(matches: &ArgMatches) -> RankOptions {
    let extensions = matches
        .get_one::<String>("extensions")
        .map(|s| ExtensionFilter::parse(s))
        .unwrap_or_default();
    let workers = matches
        .get_one::<usize>("workers")
        .copied()
        .unwrap_or(DEFAULT_WORKERS);
    let every = matches
        .get_one::<u64>("every")
        .copied()
        .unwrap_or(DEFAULT_REPORT_EVERY);

    let options = RankOptions::new()
        .extensions(extensions)
        .workers(workers)
        .report_every(every);

    if matches.get_flag("name") {
        options.by_name()
    } else {
        options
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let source = matches
        .get_one::<PathBuf>("source")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let options = build_options(matches);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = rank_authors(&source, options, &mut out)?;
    out.flush()?;

    tracing::debug!(
        files = result.files_discovered,
        blamed = result.files_blamed,
        failed = result.files_failed,
        total = result.total,
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
