//! Server orchestration for the superlists binary.
//!
//! [`run`] resolves configuration, prepares the database and serves the
//! router from [`crate::web`] until a shutdown signal arrives. The binary is a
//! thin wrapper around it.

pub mod cli;
pub mod logging;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use ortho_config::OrthoConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
use url::Url;

pub use self::cli::{AppConfig, Cli};
use crate::{
    db::{DbPool, apply_migrations, establish_pool},
    store::DieselListStore,
    web::{self, AppState},
};

/// Load configuration from the command line, environment and dotfiles, then
/// serve until shutdown.
///
/// # Errors
///
/// Returns any error raised while loading configuration or running the
/// server.
pub async fn run() -> Result<()> {
    let config = AppConfig::load_from_iter(std::env::args_os())
        .context("failed to load configuration")?;
    run_daemon(config).await
}

/// Serve the application using an already resolved configuration.
///
/// # Errors
///
/// Returns any failure reported while preparing the database, binding the
/// socket or serving requests.
pub async fn run_daemon(config: AppConfig) -> Result<()> {
    let pool = setup_database(&config.database).await?;
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, database = %config.database, "superlists listening");
    serve(listener, pool).await
}

/// Serve requests on `listener` until Ctrl-C or `SIGTERM`.
///
/// # Errors
///
/// Returns any I/O failure from the underlying server.
pub async fn serve(listener: TcpListener, pool: DbPool) -> Result<()> {
    let state = AppState::new(Arc::new(DieselListStore::new(pool)));
    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;
    info!("superlists stopped");
    Ok(())
}

#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
fn is_postgres_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "postgres" | "postgresql"))
        .unwrap_or(false)
}

/// Build the connection pool, audit the backend and apply pending
/// migrations.
async fn setup_database(database: &str) -> Result<DbPool> {
    let pool = establish_pool(database)
        .await
        .with_context(|| format!("failed to open database {database}"))?;
    {
        let mut conn = pool.get().await.context("failed to get db connection")?;
        #[cfg(feature = "sqlite")]
        crate::db::audit_sqlite_features(&mut conn).await?;
        #[cfg(all(feature = "postgres", not(feature = "sqlite")))]
        if is_postgres_url(database) {
            crate::db::audit_postgres_features(&mut conn).await?;
        }
        apply_migrations(&mut conn, database).await?;
    }
    Ok(pool)
}

/// Waits for a shutdown signal, completing when termination is requested.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    res = tokio::signal::ctrl_c() => {
                        if let Err(err) = res {
                            warn!(%err, "failed to listen for Ctrl-C");
                        }
                    },
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(%err, "failed to install SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await;
    }
    info!("shutdown signal received");
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for Ctrl-C");
    }
}
