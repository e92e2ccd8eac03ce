//! Utilities for integration tests.
//!
//! The `test-util` crate launches the `superlists` binary against a throwaway
//! `SQLite` database and drives it over HTTP with a small, scriptable
//! [`Browser`]. Polling helpers in [`wait`] give asynchronous page loads time
//! to settle before assertions fail.

pub mod browser;
pub mod server;
pub mod wait;

pub use browser::{Browser, BrowserError, Page, RowLookupError};
pub use server::{DbUrl, TestServer};
pub use wait::{MAX_WAIT, WaitPolicy, retry_until};

/// Error type used by helpers whose failures are only ever reported.
pub type AnyError = anyhow::Error;
