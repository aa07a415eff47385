//! Resilient FTP connection wrapper
//!
//! `Connection` hides the unreliability of a single FTP control session
//! behind a small command surface. Every command goes through
//! [`Connection::execute_with_retry`], which re-establishes the session if
//! the liveness probe fails and retries transient failures a bounded number
//! of times. Permanent failures (rejected credentials, rejected commands)
//! propagate immediately.
//!
//! Invariant: a present session handle implies an authenticated login; an
//! absent handle means the next operation reconnects first.

use crate::config::RetryPolicy;
use crate::error::{TransportError, TransportResult};
use crate::ftp::session::{FtpSession, RichEntry, SessionDialer};
use std::thread;
use tracing::{debug, info, warn};

/// Resilient wrapper around at most one live FTP session.
///
/// Not thread-safe by design: FTP allows one outstanding command per control
/// connection, so all access is sequential.
pub struct Connection<D: SessionDialer> {
    dialer: D,
    session: Option<D::Session>,
    retry: RetryPolicy,
}

impl<D: SessionDialer> Connection<D> {
    /// Establish a fresh authenticated session, retrying transient failures
    /// with exponential backoff. Construction fails if the final attempt
    /// fails or a permanent error (e.g. bad credentials) occurs.
    pub fn connect(dialer: D, retry: RetryPolicy) -> TransportResult<Self> {
        let mut conn = Self {
            dialer,
            session: None,
            retry,
        };
        conn.reconnect()?;
        Ok(conn)
    }

    /// Drop any existing session and dial a new one with backoff.
    fn reconnect(&mut self) -> TransportResult<()> {
        self.close();

        let mut last_error = None;

        for attempt in 0..=self.retry.max_connect_retries {
            if attempt > 0 {
                // Exponential backoff: base, 2*base, 4*base, ...
                let delay = self.retry.base_backoff * (1 << (attempt - 1));
                thread::sleep(delay);
            }

            match self.dialer.dial() {
                Ok(session) => {
                    info!(attempt = attempt + 1, "FTP session established");
                    self.session = Some(session);
                    return Ok(());
                }
                Err(e) if e.is_transient() => {
                    warn!(
                        attempt = attempt + 1,
                        attempts = self.retry.max_connect_retries + 1,
                        error = %e,
                        "connect attempt failed"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| TransportError::ConnectFailed {
            host: String::new(),
            reason: "connection failed after all retries".into(),
        }))
    }

    /// Probe session liveness with a no-op PWD. Returns false on any error.
    pub fn is_connected(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.pwd().is_ok(),
            None => false,
        }
    }

    /// Reconnect (replacing the session wholesale) if the liveness probe
    /// fails.
    pub fn ensure_connected(&mut self) -> TransportResult<()> {
        if !self.is_connected() {
            info!("FTP session lost, reconnecting");
            self.reconnect()?;
        }
        Ok(())
    }

    /// Run one FTP command with bounded retry.
    ///
    /// Each attempt first ensures the session is live, then invokes the
    /// operation. Transient failures sleep `retry_delay` and retry up to
    /// `max_operation_retries` total attempts; the last attempt's error
    /// propagates. Permanent failures propagate immediately.
    pub fn execute_with_retry<T, F>(&mut self, mut op: F) -> TransportResult<T>
    where
        F: FnMut(&mut D::Session) -> TransportResult<T>,
    {
        let attempts = self.retry.max_operation_retries.max(1);

        for attempt in 1..=attempts {
            self.ensure_connected()?;

            let session = match self.session.as_mut() {
                Some(s) => s,
                None => {
                    return Err(TransportError::Protocol {
                        message: "no session after reconnect".into(),
                    })
                }
            };

            match op(session) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "FTP command failed, retrying");
                    thread::sleep(self.retry.retry_delay);
                }
                Err(e) => return Err(e),
            }
        }

        Err(TransportError::Protocol {
            message: "retry loop exhausted without a result".into(),
        })
    }

    /// Change the server-side working directory (with retry).
    pub fn change_directory(&mut self, path: &str) -> TransportResult<()> {
        self.execute_with_retry(|s| s.cwd(path))
    }

    /// Machine-readable listing of the current directory (with retry).
    pub fn list_rich(&mut self) -> TransportResult<Vec<RichEntry>> {
        self.execute_with_retry(|s| s.list_rich())
    }

    /// Human-readable listing of the current directory as a forward-only
    /// sequence of raw lines (with retry). Lines are fetched once per
    /// successful attempt, so a retried attempt never double-feeds the
    /// consumer.
    pub fn list_tabular(&mut self) -> TransportResult<TabularLines> {
        let lines = self.execute_with_retry(|s| s.list_lines())?;
        Ok(TabularLines {
            inner: lines.into_iter(),
        })
    }

    /// Bare name listing of the current directory (with retry).
    pub fn list_names(&mut self) -> TransportResult<Vec<String>> {
        self.execute_with_retry(|s| s.list_names())
    }

    /// Best-effort graceful shutdown. Errors are swallowed and the handle is
    /// always cleared, so repeated calls are safe.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.quit() {
                debug!(error = %e, "error while closing FTP session");
            }
        }
    }
}

impl<D: SessionDialer> Drop for Connection<D> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Forward-only sequence of raw LIST lines
pub struct TabularLines {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for TabularLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }
}
