//! Directory listing strategies
//!
//! FTP servers disagree about which listing commands they support correctly,
//! so the walker carries three interchangeable strategies and probes once per
//! crawl which one works:
//!
//! 1. [`RichMetadata`] - MLSD, one round trip, authoritative type facts
//! 2. [`Tabular`] - LIST, one round trip, parses `ls -l`-style lines
//! 3. [`NameProbe`] - NLST plus a CWD probe per name; slow but universal
//!
//! A strategy reports [`ListOutcome::Unusable`] when the server rejects its
//! command outright; that is data, not an error, and drives the fallback in
//! [`select_strategy`]. An empty [`ListOutcome::Listed`] means the directory
//! has no entries and is a success.

mod name_probe;
mod rich;
mod tabular;

pub use name_probe::NameProbe;
pub use rich::RichMetadata;
pub use tabular::Tabular;

use crate::error::{TransportResult, WalkerError};
use crate::ftp::{Connection, SessionDialer};
use std::fmt;
use tracing::{debug, info, warn};

/// One child of a directory, as normalized by a listing strategy.
///
/// The name is never `.` or `..`; symbolic links keep only the link's own
/// name, never the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Result of asking one strategy to list the current directory.
#[derive(Debug)]
pub enum ListOutcome {
    /// The strategy works here; the directory contains these entries
    /// (possibly none).
    Listed(Vec<Entry>),

    /// The server rejected this strategy's command; try the next one.
    Unusable,
}

/// Identity of a listing strategy, ordered by preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    RichMetadata,
    Tabular,
    NameProbe,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::RichMetadata => write!(f, "rich-metadata (MLSD)"),
            StrategyKind::Tabular => write!(f, "tabular (LIST)"),
            StrategyKind::NameProbe => write!(f, "name-probe (NLST)"),
        }
    }
}

/// One interchangeable algorithm for enumerating the server's current
/// directory into normalized entries.
pub trait ListingStrategy<D: SessionDialer> {
    fn kind(&self) -> StrategyKind;

    /// List the server's current working directory.
    ///
    /// `Ok(Unusable)` means this strategy does not work against this server;
    /// `Err` means the transport itself failed (retries already exhausted).
    fn list(&self, conn: &mut Connection<D>) -> TransportResult<ListOutcome>;
}

/// Pick the most capable strategy the server supports by probing the
/// connection's current directory in preference order.
///
/// The first strategy that returns a usable result (including an empty
/// listing) is fixed for the remainder of the crawl. Probe errors fall
/// through to the next candidate; if no candidate works the crawl cannot
/// proceed.
pub fn select_strategy<D: SessionDialer>(
    conn: &mut Connection<D>,
) -> Result<Box<dyn ListingStrategy<D>>, WalkerError> {
    let candidates: Vec<Box<dyn ListingStrategy<D>>> = vec![
        Box::new(RichMetadata),
        Box::new(Tabular),
        Box::new(NameProbe),
    ];

    for strategy in candidates {
        match strategy.list(conn) {
            Ok(ListOutcome::Listed(_)) => {
                info!(strategy = %strategy.kind(), "listing strategy selected");
                return Ok(strategy);
            }
            Ok(ListOutcome::Unusable) => {
                debug!(strategy = %strategy.kind(), "not supported by this server");
            }
            Err(e) => {
                warn!(strategy = %strategy.kind(), error = %e, "strategy probe failed");
            }
        }
    }

    Err(WalkerError::NoUsableStrategy)
}
