//! Binary entry point for the superlists server.
//!
//! The runtime logic lives in `superlists::server`, so this binary only
//! installs logging and delegates to the shared library code.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    superlists::server::logging::init_logging();
    superlists::server::run().await
}
