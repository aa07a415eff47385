//! Session primitive traits
//!
//! [`FtpSession`] is the raw, failure-prone command surface of one
//! authenticated FTP control connection. [`SessionDialer`] knows how to
//! create fresh sessions, which is what lets [`super::Connection`] replace a
//! dead session wholesale on reconnect.

use crate::error::TransportResult;
use std::collections::HashMap;

/// One entry of a machine-readable (MLSD) listing: the entry name plus the
/// fact map the server sent for it (keys like `type`, `size`, `modify`).
#[derive(Debug, Clone)]
pub struct RichEntry {
    pub name: String,
    pub facts: HashMap<String, String>,
}

/// Raw command surface of a single authenticated FTP session.
///
/// Every method may fail transiently (timeout, reset) or permanently
/// (command not understood); callers are expected to go through
/// [`super::Connection`], which classifies and retries.
pub trait FtpSession {
    /// Change the server-side working directory.
    fn cwd(&mut self, path: &str) -> TransportResult<()>;

    /// Report the server-side working directory. Used as a liveness probe.
    fn pwd(&mut self) -> TransportResult<String>;

    /// Machine-readable listing (MLSD) of the current directory.
    fn list_rich(&mut self) -> TransportResult<Vec<RichEntry>>;

    /// Human-readable listing (LIST) of the current directory, one raw
    /// `ls -l`-style line per entry.
    fn list_lines(&mut self) -> TransportResult<Vec<String>>;

    /// Bare name listing (NLST) of the current directory.
    fn list_names(&mut self) -> TransportResult<Vec<String>>;

    /// Graceful session termination.
    fn quit(&mut self) -> TransportResult<()>;
}

/// Factory for fresh authenticated sessions.
///
/// `dial` performs connect plus login; an authentication rejection is a
/// permanent error and must not be retried by callers.
pub trait SessionDialer {
    type Session: FtpSession;

    fn dial(&self) -> TransportResult<Self::Session>;
}
