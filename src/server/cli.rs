//! Command-line and configuration types for the superlists server.
//!
//! The definitions live in the `cli-defs` crate so `build.rs` can render the
//! man page from the same source.

pub use cli_defs::{AppConfig, Cli, DEFAULT_BIND, DEFAULT_DATABASE};
