//! Connection and pool helpers for database access.

#[cfg(feature = "sqlite")]
use std::{future::Future, pin::Pin};

use cfg_if::cfg_if;
#[cfg(feature = "sqlite")]
use diesel::{ConnectionError, ConnectionResult};
#[cfg(feature = "sqlite")]
use diesel_async::pooled_connection::ManagerConfig;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, PoolError, bb8::Pool};
#[cfg(feature = "sqlite")]
use diesel_async::{AsyncConnection, SimpleAsyncConnection, sync_connection_wrapper::SyncConnectionWrapper};
use diesel_migrations::{EmbeddedMigrations, embed_migrations};

cfg_if! {
    if #[cfg(all(feature = "sqlite", feature = "postgres", not(feature = "lint")))] {
        compile_error!("Either feature 'sqlite' or 'postgres' must be enabled, not both");
    } else if #[cfg(feature = "sqlite")] {
        use diesel::sqlite::{Sqlite, SqliteConnection};
        /// Database backend type for `SQLite`.
        pub type Backend = Sqlite;
        /// Embedded database migrations for `SQLite`.
        pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");
        /// Connection type for `SQLite` database access.
        pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;
        /// Connection pool type for `SQLite`.
        pub type DbPool = Pool<DbConnection>;
    } else if #[cfg(all(feature = "postgres", not(feature = "sqlite")))] {
        use diesel::pg::Pg;
        use diesel_async::AsyncPgConnection;
        /// Database backend type for PostgreSQL.
        pub type Backend = Pg;
        /// Embedded database migrations for PostgreSQL.
        pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");
        /// Connection type for PostgreSQL database access.
        pub type DbConnection = AsyncPgConnection;
        /// Connection pool type for PostgreSQL.
        pub type DbPool = Pool<DbConnection>;
    } else {
        compile_error!("Either feature 'sqlite' or 'postgres' must be enabled");
    }
}

/// Pragmas applied to every pooled `SQLite` connection.
///
/// Pooled connections share one database file. WAL lets readers proceed
/// while a request writes, and the busy timeout makes a second writer wait
/// for the lock rather than fail with `SQLITE_BUSY`.
#[cfg(feature = "sqlite")]
const SQLITE_PRAGMAS: &str = "PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;";

#[cfg(feature = "sqlite")]
fn establish_sqlite(
    database_url: &str,
) -> Pin<Box<dyn Future<Output = ConnectionResult<DbConnection>> + Send + '_>> {
    Box::pin(async move {
        let mut conn = DbConnection::establish(database_url).await?;
        conn.batch_execute(SQLITE_PRAGMAS)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    })
}

/// Create a pooled connection to the configured database.
///
/// For `SQLite` the URL is a file path and each connection is switched to WAL
/// with a busy timeout. Every pooled connection to `:memory:` would open its
/// own empty database, so tests use a temporary file instead.
///
/// # Examples
///
/// ```no_run
/// use superlists::db::establish_pool;
/// async fn example() {
///     let pool = establish_pool("superlists.db")
///         .await
///         .expect("failed to build pool");
/// }
/// ```
///
/// # Errors
/// Returns any error reported by the underlying connection pool builder.
pub async fn establish_pool(database_url: &str) -> Result<DbPool, PoolError> {
    #[cfg(feature = "sqlite")]
    let manager = {
        let mut setup = ManagerConfig::<DbConnection>::default();
        setup.custom_setup = Box::new(establish_sqlite);
        AsyncDieselConnectionManager::<DbConnection>::new_with_config(database_url, setup)
    };
    #[cfg(not(feature = "sqlite"))]
    let manager = AsyncDieselConnectionManager::<DbConnection>::new(database_url);
    Pool::builder().build(manager).await
}
