//! Breadth-first crawl over a remote FTP tree
//!
//! [`Crawl`] is a lazy, single-pass iterator: each path is produced only as
//! the consumer asks for the next one, so memory is bounded by the frontier
//! of unexplored directories rather than the size of the tree.
//!
//! Failure policy (one bad directory must not halt the walk):
//! - a directory that cannot be entered or listed is logged and skipped,
//!   its subtree abandoned, and the crawl continues
//! - failures that make the whole crawl impossible (cannot enter the start
//!   path, no usable listing strategy) fail construction before any items
//!   are produced
//!
//! Known limitation: no cycle detection. A server that reports a directory
//! as its own descendant (symlink loops, misconfiguration) will grow the
//! frontier without bound.

use crate::error::{Result, WalkerError};
use crate::ftp::{Connection, SessionDialer};
use crate::listing::{select_strategy, ListOutcome, ListingStrategy, StrategyKind};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Proactively re-check session liveness after this many dequeued
/// directories, bounding how stale the last check can be.
const LIVENESS_INTERVAL: u64 = 50;

/// Pending directory: the absolute server path to `CWD` into and the path
/// accumulated since the crawl's start. Both carry a trailing `/`.
struct PendingDir {
    remote: String,
    relative: String,
}

/// Lazy breadth-first walk of a remote tree.
///
/// Yields one path per entry: directories with a trailing `/` (yielded when
/// discovered, before their own contents), files without. Within one
/// directory, entries keep the order the server returned them in.
///
/// The connection is owned by the crawl and released on every exit path:
/// eagerly when the frontier drains, via `Drop` when the consumer abandons
/// the iterator early.
pub struct Crawl<D: SessionDialer> {
    conn: Connection<D>,
    strategy: Box<dyn ListingStrategy<D>>,
    frontier: VecDeque<PendingDir>,
    ready: VecDeque<String>,
    processed: u64,
    since_liveness_check: u64,
    finished: bool,
}

impl<D: SessionDialer> Crawl<D> {
    /// Start a crawl at `start_path`.
    ///
    /// Enters the start directory and fixes the listing strategy for the
    /// whole crawl; either step failing means the crawl cannot proceed and
    /// no items are produced.
    pub fn new(mut conn: Connection<D>, start_path: &str) -> Result<Self> {
        let start = normalize_start_path(start_path);

        conn.change_directory(&start)
            .map_err(WalkerError::Transport)?;

        let strategy = select_strategy(&mut conn)?;

        let mut frontier = VecDeque::new();
        frontier.push_back(PendingDir {
            remote: start,
            relative: String::new(),
        });

        Ok(Self {
            conn,
            strategy,
            frontier,
            ready: VecDeque::new(),
            processed: 0,
            since_liveness_check: 0,
            finished: false,
        })
    }

    /// The strategy fixed for this crawl.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Explore the oldest frontier directory, filling `self.ready`.
    fn explore_next_dir(&mut self) -> bool {
        let Some(dir) = self.frontier.pop_front() else {
            return false;
        };

        self.since_liveness_check += 1;
        if self.since_liveness_check >= LIVENESS_INTERVAL {
            self.since_liveness_check = 0;
            // Bounded-staleness liveness check; a failure here is deferred
            // to the next retry-wrapped command rather than aborting.
            if let Err(e) = self.conn.ensure_connected() {
                warn!(error = %e, "periodic liveness check failed");
            }
        }

        if let Err(e) = self.conn.change_directory(&dir.remote) {
            warn!(path = %dir.remote, error = %e, "cannot enter directory, skipping");
            return true;
        }

        let entries = match self.strategy.list(&mut self.conn) {
            Ok(ListOutcome::Listed(entries)) => entries,
            Ok(ListOutcome::Unusable) => {
                debug!(path = %dir.remote, "listing unusable here, treating as empty");
                return true;
            }
            Err(e) => {
                warn!(path = %dir.remote, error = %e, "cannot list directory, skipping");
                return true;
            }
        };

        if entries.is_empty() {
            return true;
        }

        for entry in entries {
            let child_relative = format!("{}{}", dir.relative, entry.name);

            if entry.is_dir {
                self.ready.push_back(format!("{child_relative}/"));
                self.frontier.push_back(PendingDir {
                    remote: format!("{}{}/", dir.remote, entry.name),
                    relative: format!("{child_relative}/"),
                });
            } else {
                self.ready.push_back(child_relative);
            }
        }

        self.processed += 1;
        true
    }
}

impl<D: SessionDialer> Iterator for Crawl<D> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(path) = self.ready.pop_front() {
                return Some(path);
            }

            if self.finished {
                return None;
            }

            if !self.explore_next_dir() {
                self.finished = true;
                debug!(directories = self.processed, "crawl complete");
                self.conn.close();
                return None;
            }
        }
    }
}

/// Normalize the start path to carry exactly one trailing separator.
fn normalize_start_path(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}
