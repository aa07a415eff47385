//! suppaftp-backed session implementation
//!
//! Maps the suppaftp control connection onto the [`FtpSession`] trait and
//! translates [`suppaftp::FtpError`] into the crate's transient/permanent
//! [`TransportError`] taxonomy:
//!
//! - socket errors and 4xx replies are transient (retryable)
//! - 5xx replies and rejected credentials are permanent

use crate::error::{TransportError, TransportResult};
use crate::ftp::session::{FtpSession, RichEntry, SessionDialer};
use std::collections::HashMap;
use std::net::ToSocketAddrs;
use std::time::Duration;
use suppaftp::{FtpError, FtpStream, Status};

/// Connection parameters for dialing fresh FTP sessions
#[derive(Debug, Clone)]
pub struct FtpDialer {
    host: String,
    port: u16,
    username: String,
    password: String,
    timeout: Duration,
}

impl FtpDialer {
    pub fn new(
        host: String,
        port: u16,
        username: String,
        password: String,
        timeout: Duration,
    ) -> Self {
        Self {
            host,
            port,
            username,
            password,
            timeout,
        }
    }
}

impl SessionDialer for FtpDialer {
    type Session = StreamSession;

    fn dial(&self) -> TransportResult<StreamSession> {
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| TransportError::ConnectFailed {
                host: self.host.clone(),
                reason: "hostname resolved to no addresses".into(),
            })?;

        let mut stream = FtpStream::connect_timeout(addr, self.timeout).map_err(|e| {
            TransportError::ConnectFailed {
                host: self.host.clone(),
                reason: e.to_string(),
            }
        })?;

        stream.login(&self.username, &self.password).map_err(|e| {
            let rejected = matches!(
                &e,
                FtpError::UnexpectedResponse(resp)
                    if matches!(resp.status, Status::InvalidCredentials | Status::NotLoggedIn)
            );
            if rejected {
                TransportError::AuthRejected {
                    user: self.username.clone(),
                }
            } else {
                classify(e)
            }
        })?;

        Ok(StreamSession { stream })
    }
}

/// One live suppaftp control connection
pub struct StreamSession {
    stream: FtpStream,
}

impl FtpSession for StreamSession {
    fn cwd(&mut self, path: &str) -> TransportResult<()> {
        self.stream.cwd(path).map_err(classify)
    }

    fn pwd(&mut self) -> TransportResult<String> {
        self.stream.pwd().map_err(classify)
    }

    fn list_rich(&mut self) -> TransportResult<Vec<RichEntry>> {
        let lines = self.stream.mlsd(None).map_err(classify)?;
        Ok(lines
            .iter()
            .filter_map(|line| parse_mlsd_line(line))
            .collect())
    }

    fn list_lines(&mut self) -> TransportResult<Vec<String>> {
        self.stream.list(None).map_err(classify)
    }

    fn list_names(&mut self) -> TransportResult<Vec<String>> {
        self.stream.nlst(None).map_err(classify)
    }

    fn quit(&mut self) -> TransportResult<()> {
        self.stream.quit().map_err(classify)
    }
}

/// Parse one raw MLSD response line per RFC 3659: a `;`-separated block of
/// `key=value` facts, a single space, then the entry name (which may itself
/// contain spaces). Fact keys are case-insensitive on the wire and stored
/// lowercased. Lines without a name are dropped.
fn parse_mlsd_line(line: &str) -> Option<RichEntry> {
    let (fact_block, name) = line.split_once(' ')?;
    if name.is_empty() {
        return None;
    }

    let mut facts = HashMap::new();
    for fact in fact_block.split(';').filter(|f| !f.is_empty()) {
        if let Some((key, value)) = fact.split_once('=') {
            facts.insert(key.to_ascii_lowercase(), value.to_string());
        }
    }

    Some(RichEntry {
        name: name.to_string(),
        facts,
    })
}

/// Translate a suppaftp error into the crate taxonomy.
///
/// 4xx replies mean "try again later" per RFC 959; everything 5xx is a
/// definitive rejection of the command.
fn classify(err: FtpError) -> TransportError {
    match err {
        FtpError::ConnectionError(e) => match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                TransportError::Timeout(e.to_string())
            }
            _ => TransportError::Io(e),
        },
        FtpError::UnexpectedResponse(resp) => {
            let message = format!("{:?}", resp.status);
            match resp.status {
                Status::NotAvailable
                | Status::CannotOpenDataConnection
                | Status::TransferAborted
                | Status::RequestFileActionIgnored
                | Status::ActionAborted => TransportError::TemporaryFailure { message },
                _ => TransportError::CommandRejected { message },
            }
        }
        FtpError::BadResponse => TransportError::Protocol {
            message: "malformed server response".into(),
        },
        other => TransportError::Protocol {
            message: other.to_string(),
        },
    }
}
