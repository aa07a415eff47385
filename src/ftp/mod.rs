//! FTP access module
//!
//! This module wraps a single FTP control session behind a resilient
//! [`Connection`] that transparently reconnects and retries transient
//! failures.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Connection<D>                     │
//! │  - owns at most one authenticated session           │
//! │  - PWD as liveness probe                            │
//! │  - exponential backoff on reconnect                 │
//! │  - bounded retry around every command               │
//! └──────────────────────────┬──────────────────────────┘
//!                            │ FtpSession / SessionDialer
//!                            ▼
//! ┌─────────────────────────────────────────────────────┐
//! │              FtpDialer / StreamSession               │
//! │  - suppaftp control connection + login              │
//! │  - MLSD / LIST / NLST / CWD / PWD / QUIT            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The traits exist so the traversal engine and listing strategies can be
//! exercised against an in-memory server in tests.

mod connection;
mod session;
mod stream;

pub use connection::{Connection, TabularLines};
pub use session::{FtpSession, RichEntry, SessionDialer};
pub use stream::{FtpDialer, StreamSession};
