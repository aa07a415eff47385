//! Error types for ftp-walker
//!
//! This module defines the error hierarchy that covers:
//! - FTP transport and protocol errors
//! - Configuration and CLI errors
//! - Crawl-level failures
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Every transport error is classified as transient or permanent; only
//!   transient errors are ever retried
//! - Preserve error chains for debugging

use thiserror::Error;

/// Top-level error type for the ftp-walker application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// FTP transport errors
    #[error("FTP error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No listing strategy works against this server
    #[error("Server supports none of the directory listing methods (MLSD, LIST, NLST)")]
    NoUsableStrategy,
}

/// FTP transport and protocol errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Socket-level failure (reset, refused, broken pipe, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not establish a control connection
    #[error("Failed to connect to '{host}': {reason}")]
    ConnectFailed { host: String, reason: String },

    /// An operation exceeded its deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Server reported a temporary condition (4xx reply)
    #[error("Server temporarily unavailable: {message}")]
    TemporaryFailure { message: String },

    /// Credentials rejected by the server
    #[error("Authentication rejected for user '{user}'")]
    AuthRejected { user: String },

    /// Server rejected the command outright (5xx reply)
    #[error("Command rejected by server: {message}")]
    CommandRejected { message: String },

    /// Malformed or unparseable server response
    #[error("Protocol error: {message}")]
    Protocol { message: String },
}

impl TransportError {
    /// Check if retrying this error can plausibly succeed.
    ///
    /// Timeouts, resets, and temporary server conditions are transient;
    /// rejected credentials or commands are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Io(_)
                | TransportError::ConnectFailed { .. }
                | TransportError::Timeout(_)
                | TransportError::TemporaryFailure { .. }
        )
    }

    /// Check if the server rejected the command itself (as opposed to the
    /// connection failing). Listing strategies use this to signal "unusable
    /// on this server" rather than a fatal crawl error.
    pub fn is_command_rejection(&self) -> bool {
        matches!(self, TransportError::CommandRejected { .. })
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Empty or whitespace-only host
    #[error("Host must not be empty")]
    EmptyHost,

    /// Invalid retry count
    #[error("Invalid retry count {count}: must be at most {max}")]
    InvalidRetryCount { count: u32, max: u32 },

    /// Zero timeout
    #[error("Timeout must be at least 1 second")]
    InvalidTimeout,

    /// Invalid start path
    #[error("Invalid start path '{path}': {reason}")]
    InvalidStartPath { path: String, reason: String },

    /// No password available (env var unset and prompt failed)
    #[error("No password provided: set FTP_PASSWORD or enter one at the prompt")]
    MissingPassword,
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for TransportError
pub type TransportResult<T> = std::result::Result<T, TransportError>;
