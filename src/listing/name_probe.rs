//! Name-probe listing strategy (NLST + CWD)
//!
//! The guaranteed fallback: any FTP server can return bare names. Whether a
//! name is a directory is determined by attempting to change into it and
//! back. One or two extra round trips per entry make this the slowest
//! strategy, so it is only used when both MLSD and LIST are unusable.

use super::{Entry, ListOutcome, ListingStrategy, StrategyKind};
use crate::error::TransportResult;
use crate::ftp::{Connection, SessionDialer};

pub struct NameProbe;

impl<D: SessionDialer> ListingStrategy<D> for NameProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NameProbe
    }

    fn list(&self, conn: &mut Connection<D>) -> TransportResult<ListOutcome> {
        let names = match conn.list_names() {
            Ok(names) => names,
            Err(e) if e.is_command_rejection() => return Ok(ListOutcome::Unusable),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::with_capacity(names.len());

        for name in names {
            if name == "." || name == ".." {
                continue;
            }

            // A directory is a name we can enter and leave again; any
            // failure along the way classifies the name as a file.
            let is_dir = match conn.change_directory(&name) {
                Ok(()) => conn.change_directory("..").is_ok(),
                Err(_) => false,
            };

            entries.push(Entry { name, is_dir });
        }

        Ok(ListOutcome::Listed(entries))
    }
}
