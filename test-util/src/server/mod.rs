//! Test server harness used by integration suites.
//!
//! Launches the `superlists` binary on an ephemeral port against a throwaway
//! `SQLite` database (or the database named by `SUPERLISTS_TEST_DATABASE_URL`),
//! waits for it to accept connections, and tears it down once the test
//! finishes.

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
};

mod env;
mod readiness;

pub use env::{DbUrl, TEST_DATABASE_ENV};
#[cfg(unix)]
use nix::{
    sys::signal::{Signal, kill},
    unistd::Pid,
};
use readiness::wait_for_server;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use url::Url;

use crate::AnyError;

/// Log filter handed to the child unless `RUST_LOG` is already set.
const CHILD_LOG_FILTER: &str = "warn";

/// Creates a temporary `SQLite` database path at `temp/superlists.db`.
fn sqlite_url(temp: &TempDir) -> Result<DbUrl, AnyError> {
    let path = temp.path().join("superlists.db");
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("database path is not valid UTF-8"))?;
    Ok(DbUrl::from(path_str))
}

fn free_port() -> Result<u16, AnyError> {
    let socket = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    Ok(socket.local_addr()?.port())
}

/// Builds the command that runs the server binary bound to `addr` and
/// `db_url`.
fn server_command(binary: &Path, addr: SocketAddr, db_url: &DbUrl) -> Command {
    let mut cmd = Command::new(binary);
    cmd.arg("--bind");
    cmd.arg(addr.to_string());
    cmd.arg("--database");
    cmd.arg(db_url.as_str());
    if std::env::var_os("RUST_LOG").is_none() {
        cmd.env("RUST_LOG", CHILD_LOG_FILTER);
    }
    cmd.stdout(Stdio::null()).stderr(Stdio::inherit());
    cmd
}

/// Spawns the server process on an ephemeral port and waits for the socket to
/// accept connections before returning the child handle and address.
#[expect(
    clippy::let_underscore_must_use,
    reason = "best-effort cleanup; error already being propagated"
)]
fn launch_server_process(binary: &Path, db_url: &DbUrl) -> Result<(Child, SocketAddr), AnyError> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, free_port()?));

    info!(%addr, db_url = %db_url, "launching server");
    let mut child = server_command(binary, addr, db_url).spawn()?;
    debug!("spawned server process, waiting for readiness");
    if let Err(e) = wait_for_server(&mut child, addr) {
        warn!(error = %e, "wait_for_server failed");
        let _ = child.kill();
        let _ = child.wait();
        return Err(e);
    }
    info!(%addr, "server ready");
    Ok((child, addr))
}

/// Integration test server wrapper that spawns the `superlists` process,
/// waits for readiness, and tears it down automatically on drop.
#[derive(Debug)]
pub struct TestServer {
    child: Child,
    addr: SocketAddr,
    binary: PathBuf,
    db_url: DbUrl,
    temp_dir: Option<TempDir>,
}

impl TestServer {
    /// Launches `binary` against a fresh database, returning an error if the
    /// database path cannot be prepared or readiness times out (ten seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if database or server initialisation fails.
    pub fn start(binary: impl AsRef<Path>) -> Result<Self, AnyError> {
        if let Some(db_url) = DbUrl::from_env() {
            return Self::launch(binary.as_ref(), db_url, None);
        }
        let temp = TempDir::new()?;
        let db_url = sqlite_url(&temp)?;
        Self::launch(binary.as_ref(), db_url, Some(temp))
    }

    /// Stops the server and starts the same binary again on a new port,
    /// keeping the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the new process does not become ready.
    pub fn restart(mut self) -> Result<Self, AnyError> {
        self.terminate();
        let temp_dir = self.temp_dir.take();
        Self::launch(&self.binary, self.db_url.clone(), temp_dir)
    }

    fn launch(binary: &Path, db_url: DbUrl, temp_dir: Option<TempDir>) -> Result<Self, AnyError> {
        let (child, addr) = launch_server_process(binary, &db_url)?;
        Ok(Self {
            child,
            addr,
            binary: binary.to_path_buf(),
            db_url,
            temp_dir,
        })
    }

    /// Root URL of the running site.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not form a valid URL.
    pub fn base_url(&self) -> Result<Url, AnyError> { Ok(Url::parse(&format!("http://{}/", self.addr))?) }

    /// Returns the database URL used by the server.
    #[must_use]
    pub const fn db_url(&self) -> &DbUrl { &self.db_url }

    #[expect(
        clippy::let_underscore_must_use,
        reason = "best-effort cleanup; callers cannot act on the failure"
    )]
    fn terminate(&mut self) {
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return;
        }
        #[cfg(unix)]
        {
            #[expect(
                clippy::cast_possible_wrap,
                reason = "process IDs won't exceed i32::MAX on supported platforms"
            )]
            let _ = kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM);
        }
        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) { self.terminate(); }
}
