//! Fixed-size pool of blame workers.
//!
//! Workers share one file queue (first to receive wins) and push into one
//! merged event queue. Every worker holds its own clone of the event
//! sender and the pool keeps none, so the merged queue disconnects exactly
//! when the last worker returns. A consumer draining
//! [`BlamePool::events`] to disconnection has therefore seen every event.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::error::BlameRankError;
use crate::git::Blame;
use crate::stats::AttributedLine;
use crate::Result;

/// Worker count used when none is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// A file that could not be blamed.
#[derive(Debug)]
pub struct FileFailure {
    /// Path as discovered
    pub path: PathBuf,
    /// Why blame failed
    pub error: BlameRankError,
}

/// What travels on the merged queue.
#[derive(Debug)]
pub enum BlameEvent {
    /// One line of a successfully blamed file
    Line(AttributedLine),
    /// A file that contributes no lines
    Failed(FileFailure),
}

/// Per-worker counters, summed by [`BlamePool::join`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    /// Files blamed successfully
    pub files_blamed: u64,
    /// Files whose blame failed
    pub files_failed: u64,
    /// Lines pushed onto the merged queue
    pub lines: u64,
}

impl std::ops::AddAssign for PoolSummary {
    fn add_assign(&mut self, other: Self) {
        self.files_blamed += other.files_blamed;
        self.files_failed += other.files_failed;
        self.lines += other.lines;
    }
}

/// Running blame workers and the receiving end of their merged output.
pub struct BlamePool {
    events: Receiver<BlameEvent>,
    workers: Vec<JoinHandle<PoolSummary>>,
}

impl BlamePool {
    /// Start `workers` threads blaming paths received from `files`.
    ///
    /// `capacity` bounds the merged queue; zero makes every push a
    /// rendezvous with the consumer.
    pub fn spawn<B>(
        blamer: Arc<B>,
        files: Receiver<PathBuf>,
        workers: usize,
        capacity: usize,
    ) -> Result<Self>
    where
        B: Blame + ?Sized + 'static,
    {
        if workers == 0 {
            return Err(BlameRankError::InvalidWorkerCount(workers));
        }

        let (tx, rx) = crossbeam_channel::bounded(capacity);
        let mut handles = Vec::with_capacity(workers);

        for worker in 0..workers {
            let blamer = Arc::clone(&blamer);
            let files = files.clone();
            let tx = tx.clone();

            let handle = thread::Builder::new()
                .name(format!("blame-{}", worker))
                .spawn(move || run_worker(worker, blamer.as_ref(), &files, &tx))?;
            handles.push(handle);
        }

        // Only worker-owned senders remain from here on.
        drop(tx);

        tracing::debug!(workers, capacity, "blame pool started");

        Ok(Self {
            events: rx,
            workers: handles,
        })
    }

    /// The merged event queue.
    pub fn events(&self) -> &Receiver<BlameEvent> {
        &self.events
    }

    /// Wait for every worker and sum their counters.
    ///
    /// Call after draining [`events`](Self::events); with a bounded queue a
    /// worker blocked on a full queue would otherwise never return.
    pub fn join(self) -> Result<PoolSummary> {
        let BlamePool { events, workers } = self;
        drop(events);

        let mut summary = PoolSummary::default();
        for (worker, handle) in workers.into_iter().enumerate() {
            summary += handle
                .join()
                .map_err(|_| BlameRankError::WorkerPanicked(worker))?;
        }
        Ok(summary)
    }
}

fn run_worker<B>(
    worker: usize,
    blamer: &B,
    files: &Receiver<PathBuf>,
    events: &Sender<BlameEvent>,
) -> PoolSummary
where
    B: Blame + ?Sized,
{
    let mut summary = PoolSummary::default();

    for path in files.iter() {
        match blamer.blame(&path) {
            Ok(lines) => {
                summary.files_blamed += 1;
                for line in lines {
                    if events.send(BlameEvent::Line(line)).is_err() {
                        tracing::debug!(worker, "event queue closed, stopping worker");
                        return summary;
                    }
                    summary.lines += 1;
                }
            }
            Err(error) => {
                tracing::debug!(worker, path = %path.display(), error = %error, "blame failed");
                summary.files_failed += 1;
                if events
                    .send(BlameEvent::Failed(FileFailure { path, error }))
                    .is_err()
                {
                    tracing::debug!(worker, "event queue closed, stopping worker");
                    return summary;
                }
            }
        }
    }

    tracing::debug!(
        worker,
        files = summary.files_blamed,
        failed = summary.files_failed,
        "worker finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    /// Blames by file name from a fixed table; unknown names fail.
    struct TableBlamer {
        files: HashMap<String, Vec<AttributedLine>>,
    }

    impl TableBlamer {
        fn new(files: &[(&str, &str, usize)]) -> Self {
            let files = files
                .iter()
                .map(|(name, author, lines)| {
                    let lines = (0..*lines)
                        .map(|i| AttributedLine::new(*author, format!("{} line {}", name, i)))
                        .collect();
                    (name.to_string(), lines)
                })
                .collect();
            Self { files }
        }
    }

    impl Blame for TableBlamer {
        fn blame(&self, path: &Path) -> Result<Vec<AttributedLine>> {
            let name = path.to_string_lossy().to_string();
            self.files
                .get(&name)
                .cloned()
                .ok_or_else(|| BlameRankError::NotInRepository {
                    path: path.to_path_buf(),
                    message: "not tracked".to_string(),
                })
        }
    }

    fn feed(paths: &[&str]) -> Receiver<PathBuf> {
        let (tx, rx) = crossbeam_channel::unbounded();
        for p in paths {
            tx.send(PathBuf::from(p)).unwrap();
        }
        rx
    }

    #[test]
    fn test_zero_workers_rejected() {
        let blamer = Arc::new(TableBlamer::new(&[]));
        let result = BlamePool::spawn(blamer, feed(&[]), 0, 0);

        assert!(matches!(result, Err(BlameRankError::InvalidWorkerCount(0))));
    }

    #[test]
    fn test_empty_input_closes_queue() {
        let blamer = Arc::new(TableBlamer::new(&[]));
        let pool = BlamePool::spawn(blamer, feed(&[]), 4, 0).unwrap();

        assert_eq!(pool.events().iter().count(), 0);
        assert_eq!(pool.join().unwrap(), PoolSummary::default());
    }

    #[test]
    fn test_every_line_delivered_once() {
        let names: Vec<String> = (0..40).map(|i| format!("f{}.rb", i)).collect();
        let table: Vec<(&str, &str, usize)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), if i % 2 == 0 { "alice" } else { "bob" }, 25))
            .collect();
        let blamer = Arc::new(TableBlamer::new(&table));
        let paths: Vec<&str> = names.iter().map(|s| s.as_str()).collect();

        let pool = BlamePool::spawn(blamer, feed(&paths), 4, 0).unwrap();

        let mut seen: HashMap<String, usize> = HashMap::new();
        for event in pool.events().iter() {
            match event {
                BlameEvent::Line(line) => *seen.entry(line.text).or_insert(0) += 1,
                BlameEvent::Failed(f) => panic!("unexpected failure: {:?}", f),
            }
        }

        assert_eq!(seen.len(), 40 * 25);
        assert!(seen.values().all(|&n| n == 1));

        let summary = pool.join().unwrap();
        assert_eq!(summary.files_blamed, 40);
        assert_eq!(summary.lines, 1000);
    }

    #[test]
    fn test_failure_is_isolated() {
        let blamer = Arc::new(TableBlamer::new(&[
            ("a.rb", "alice", 3),
            ("b.rb", "bob", 4),
            ("d.rb", "carol", 5),
            ("e.rb", "alice", 6),
        ]));
        let pool = BlamePool::spawn(
            blamer,
            feed(&["a.rb", "b.rb", "broken.rb", "d.rb", "e.rb"]),
            3,
            8,
        )
        .unwrap();

        let mut lines = 0;
        let mut failures = Vec::new();
        for event in pool.events().iter() {
            match event {
                BlameEvent::Line(_) => lines += 1,
                BlameEvent::Failed(f) => failures.push(f.path),
            }
        }

        assert_eq!(lines, 3 + 4 + 5 + 6);
        assert_eq!(failures, vec![PathBuf::from("broken.rb")]);

        let summary = pool.join().unwrap();
        assert_eq!(summary.files_blamed, 4);
        assert_eq!(summary.files_failed, 1);
    }

    #[test]
    fn test_lines_of_a_file_keep_order() {
        let blamer = Arc::new(TableBlamer::new(&[("only.rb", "alice", 50)]));
        let pool = BlamePool::spawn(blamer, feed(&["only.rb"]), 4, 0).unwrap();

        let texts: Vec<String> = pool
            .events()
            .iter()
            .filter_map(|e| match e {
                BlameEvent::Line(line) => Some(line.text),
                BlameEvent::Failed(_) => None,
            })
            .collect();

        let expected: Vec<String> = (0..50).map(|i| format!("only.rb line {}", i)).collect();
        assert_eq!(texts, expected);
        pool.join().unwrap();
    }

    #[test]
    fn test_dropped_consumer_stops_workers() {
        let blamer = Arc::new(TableBlamer::new(&[("big.rb", "alice", 10_000)]));
        let pool = BlamePool::spawn(blamer, feed(&["big.rb"]), 2, 0).unwrap();

        let first = pool.events().recv().unwrap();
        assert!(matches!(first, BlameEvent::Line(_)));

        let summary = pool.join().unwrap();
        assert!(summary.lines < 10_000);
    }
}
