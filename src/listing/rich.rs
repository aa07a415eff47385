//! Rich-metadata listing strategy (MLSD)
//!
//! One round trip per directory; the server reports a fact map per entry and
//! `type=dir` (case-insensitive) marks directories. Preferred whenever the
//! server supports it.

use super::{Entry, ListOutcome, ListingStrategy, StrategyKind};
use crate::error::TransportResult;
use crate::ftp::{Connection, RichEntry, SessionDialer};

pub struct RichMetadata;

impl<D: SessionDialer> ListingStrategy<D> for RichMetadata {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RichMetadata
    }

    fn list(&self, conn: &mut Connection<D>) -> TransportResult<ListOutcome> {
        let raw = match conn.list_rich() {
            Ok(raw) => raw,
            Err(e) if e.is_command_rejection() => return Ok(ListOutcome::Unusable),
            Err(e) => return Err(e),
        };

        let entries = raw
            .into_iter()
            .filter(|entry| entry.name != "." && entry.name != "..")
            .map(|entry| {
                let is_dir = entry_is_dir(&entry);
                Entry {
                    name: entry.name,
                    is_dir,
                }
            })
            .collect();

        Ok(ListOutcome::Listed(entries))
    }
}

fn entry_is_dir(entry: &RichEntry) -> bool {
    entry
        .facts
        .get("type")
        .map(|t| t.eq_ignore_ascii_case("dir"))
        .unwrap_or(false)
}
