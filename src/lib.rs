//! ftp-walker - Resilient Recursive FTP Directory Walker
//!
//! Walks a remote FTP tree breadth-first and yields every path as a lazy
//! stream, tolerating the realities of old FTP deployments: connections
//! drop, commands time out, and servers disagree about which listing
//! commands they support.
//!
//! # Features
//!
//! - **Automatic reconnect**: a single resilient connection replaces its
//!   session on failure, with exponential backoff and bounded retry.
//!
//! - **Listing-strategy fallback**: probes MLSD, then LIST, then NLST with
//!   directory probing, and fixes the most capable method once per crawl.
//!
//! - **Lazy output**: paths are produced one at a time as the consumer
//!   pulls them; memory is bounded by the frontier, not the tree.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  FTP server                    │
//! └──────────────────────┬────────────────────────┘
//!                        │ one command at a time
//!                        ▼
//! ┌───────────────────────────────────────────────┐
//! │           Connection (ftp module)              │
//! │   reconnect + backoff + bounded retry          │
//! └──────────────────────┬────────────────────────┘
//!                        │
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//! ┌──────────────────┐      ┌─────────────────────┐
//! │ ListingStrategy  │◄─────│   Crawl (walker)     │
//! │ MLSD/LIST/NLST   │      │ BFS frontier, lazy   │
//! └──────────────────┘      │ Iterator<Item=path>  │
//!                           └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ftp_walker::config::RetryPolicy;
//! use ftp_walker::ftp::{Connection, FtpDialer};
//! use ftp_walker::walker::Crawl;
//!
//! let dialer = FtpDialer::new(
//!     "ftp.example.com".into(),
//!     21,
//!     "anonymous".into(),
//!     "guest".into(),
//!     std::time::Duration::from_secs(30),
//! );
//! let conn = Connection::connect(dialer, RetryPolicy::default()).unwrap();
//!
//! for path in Crawl::new(conn, "/pub").unwrap() {
//!     println!("{path}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod ftp;
pub mod listing;
pub mod progress;
pub mod walker;

pub use config::{RetryPolicy, WalkConfig};
pub use error::{Result, TransportError, WalkerError};
pub use ftp::{Connection, FtpDialer};
pub use walker::Crawl;
