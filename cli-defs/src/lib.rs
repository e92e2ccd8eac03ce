//! Shared CLI type definitions for the superlists build and runtime.
//!
//! The `build.rs` script renders a man page from [`Cli`], while the server
//! binary loads [`AppConfig`] through `OrthoConfig`, layering command-line
//! flags over `SUPERLISTS_*` environment variables, a `.superlists.toml`
//! dotfile, and the defaults declared here.

// FIXME: File-wide suppressions are unavoidable here. Clap and OrthoConfig derive macros
// inject generated code throughout the module, and there is no mechanism to narrow
// the scope without restructuring the crate.
#![expect(
    non_snake_case,
    reason = "Clap/OrthoConfig derive macros generate helper modules with uppercase names"
)]
#![expect(
    missing_docs,
    reason = "OrthoConfig and Clap derive macros generate items that cannot be documented"
)]

use clap::{Args, Parser};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// Address the server binds to when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE: &str = "superlists.db";

/// Runtime configuration for the superlists server.
///
/// The default bind address only listens on loopback. Deployments that need
/// to be reachable from elsewhere should set `--bind` (or `SUPERLISTS_BIND`)
/// explicitly and sit behind a reverse proxy.
#[derive(Args, OrthoConfig, Serialize, Deserialize, Default, Debug, Clone)]
#[ortho_config(prefix = "SUPERLISTS_")]
pub struct AppConfig {
    /// Server bind address.
    #[ortho_config(default = DEFAULT_BIND.to_owned())]
    #[arg(long, default_value_t = String::from(DEFAULT_BIND))]
    pub bind: String,
    /// Database connection string or `SQLite` file path.
    #[ortho_config(default = DEFAULT_DATABASE.to_owned())]
    #[arg(long, default_value_t = String::from(DEFAULT_DATABASE))]
    pub database: String,
}

/// Top-level CLI entry point, used for man page generation.
#[derive(Parser, Deserialize, Serialize, Debug, Clone)]
#[command(name = "superlists", about = "To-do lists addressed by their own URL")]
pub struct Cli {
    /// Application configuration.
    #[command(flatten)]
    pub config: AppConfig,
}
