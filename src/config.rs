//! Configuration types for ftp-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - The retry policy shared by connection and command retry loops

use crate::error::ConfigError;
use clap::Parser;
use std::time::Duration;

/// Maximum reasonable retry count (the backoff doubles per attempt)
const MAX_RETRIES: u32 = 16;

/// Recursive FTP directory walker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ftp-walker",
    version,
    about = "Recursively lists every file and directory on an FTP server",
    long_about = "Walks a remote FTP tree breadth-first and prints one path per line,\n\
                  directories with a trailing slash.\n\n\
                  The walker picks the most capable listing command the server\n\
                  supports (MLSD, then LIST, then NLST with directory probing) and\n\
                  transparently reconnects when the control connection drops.\n\n\
                  The password is read from the FTP_PASSWORD environment variable,\n\
                  or prompted for interactively.",
    after_help = "EXAMPLES:\n    \
        ftp-walker ftp.example.com anonymous\n    \
        ftp-walker ftp.example.com alice -d /pub/releases\n    \
        FTP_PASSWORD=secret ftp-walker 192.168.1.10 bob -q > listing.txt"
)]
pub struct CliArgs {
    /// FTP server hostname or IP
    #[arg(value_name = "HOST")]
    pub host: String,

    /// FTP username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Remote directory to start walking from
    #[arg(short = 'd', long, default_value = "/", value_name = "PATH")]
    pub directory: String,

    /// FTP control port
    #[arg(long, default_value = "21", value_name = "PORT")]
    pub port: u16,

    /// Connect timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    pub timeout: u64,

    /// Number of extra connection attempts after a transient failure
    #[arg(long, default_value = "3", value_name = "NUM")]
    pub connect_retries: u32,

    /// Number of attempts per FTP command before giving up
    #[arg(long, default_value = "3", value_name = "NUM")]
    pub op_retries: u32,

    /// Quiet mode - print paths only, no header or summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (show per-directory detail and retries)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Bounded-retry parameters for the connection layer.
///
/// Connect attempts back off exponentially (`base_backoff` doubling per
/// attempt); command retries wait a flat `retry_delay` between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra connect attempts after the first one fails transiently
    pub max_connect_retries: u32,

    /// Total attempts for a single FTP command
    pub max_operation_retries: u32,

    /// First backoff delay between connect attempts (doubles each retry)
    pub base_backoff: Duration,

    /// Flat delay between command retry attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_connect_retries: 3,
            max_operation_retries: 3,
            base_backoff: Duration::from_secs(1),
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// FTP server hostname or IP
    pub host: String,

    /// FTP control port
    pub port: u16,

    /// FTP username
    pub username: String,

    /// FTP password
    pub password: String,

    /// Remote directory the walk starts from
    pub start_path: String,

    /// Connect timeout
    pub timeout: Duration,

    /// Retry/backoff parameters
    pub retry: RetryPolicy,

    /// Print header and summary
    pub show_report: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl WalkConfig {
    /// Create and validate configuration from CLI arguments plus the
    /// separately-obtained password (env var or interactive prompt).
    pub fn from_args(args: CliArgs, password: String) -> Result<Self, ConfigError> {
        let host = args.host.trim().to_string();
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if args.connect_retries > MAX_RETRIES {
            return Err(ConfigError::InvalidRetryCount {
                count: args.connect_retries,
                max: MAX_RETRIES,
            });
        }

        if args.op_retries == 0 || args.op_retries > MAX_RETRIES {
            return Err(ConfigError::InvalidRetryCount {
                count: args.op_retries,
                max: MAX_RETRIES,
            });
        }

        if args.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if !args.directory.starts_with('/') {
            return Err(ConfigError::InvalidStartPath {
                path: args.directory,
                reason: "must be an absolute path".into(),
            });
        }

        let retry = RetryPolicy {
            max_connect_retries: args.connect_retries,
            max_operation_retries: args.op_retries,
            ..RetryPolicy::default()
        };

        Ok(Self {
            host,
            port: args.port,
            username: args.username,
            password,
            start_path: args.directory,
            timeout: Duration::from_secs(args.timeout),
            retry,
            show_report: !args.quiet,
            verbose: args.verbose,
        })
    }
}
