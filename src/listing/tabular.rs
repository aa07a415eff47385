//! Tabular listing strategy (LIST)
//!
//! Parses the one well-known `ls -l`-style convention:
//!
//! ```text
//! drwxr-xr-x   2 ftp      ftp          4096 Mar 01 12:00 pub
//! lrwxrwxrwx   1 ftp      ftp            11 Mar 01 12:00 latest -> releases/v2
//! ```
//!
//! A line splits on whitespace runs into at most 9 columns so a filename
//! containing spaces stays intact in the final column. Lines with fewer than
//! 4 columns are malformed and silently dropped; the first column's leading
//! `d` marks a directory; a `" -> "` suffix on the name is a symlink target
//! and is discarded.

use super::{Entry, ListOutcome, ListingStrategy, StrategyKind};
use crate::error::TransportResult;
use crate::ftp::{Connection, SessionDialer};

/// Columns in a `ls -l` line: permissions, link count, owner, group, size,
/// month, day, time/year, name.
const MAX_COLUMNS: usize = 9;

/// Minimum columns for a line to be considered well-formed
const MIN_COLUMNS: usize = 4;

pub struct Tabular;

impl<D: SessionDialer> ListingStrategy<D> for Tabular {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Tabular
    }

    fn list(&self, conn: &mut Connection<D>) -> TransportResult<ListOutcome> {
        let lines = match conn.list_tabular() {
            Ok(lines) => lines,
            Err(e) if e.is_command_rejection() => return Ok(ListOutcome::Unusable),
            Err(e) => return Err(e),
        };

        let entries = lines.filter_map(|line| parse_line(&line)).collect();
        Ok(ListOutcome::Listed(entries))
    }
}

/// Parse one raw LIST line into an entry.
///
/// Returns None for blank or malformed lines and for `.`/`..`.
fn parse_line(line: &str) -> Option<Entry> {
    let columns = split_columns(line, MAX_COLUMNS);
    if columns.len() < MIN_COLUMNS {
        return None;
    }

    let is_dir = columns[0].starts_with('d');

    let mut name = *columns.last()?;
    if let Some(idx) = name.find(" -> ") {
        name = &name[..idx];
    }

    if name == "." || name == ".." {
        return None;
    }

    Some(Entry::new(name, is_dir))
}

/// Split a line on whitespace runs into at most `max` columns, keeping the
/// remainder of the line whole in the final column.
fn split_columns(line: &str, max: usize) -> Vec<&str> {
    let mut columns = Vec::new();
    let mut rest = line.trim_start();

    while columns.len() + 1 < max {
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                columns.push(&rest[..idx]);
                rest = rest[idx..].trim_start();
                if rest.is_empty() {
                    return columns;
                }
            }
            None => {
                if !rest.is_empty() {
                    columns.push(rest);
                }
                return columns;
            }
        }
    }

    let rest = rest.trim_end();
    if !rest.is_empty() {
        columns.push(rest);
    }
    columns
}
