//! Manage database connections and list queries.
//!
//! This module tree exposes helpers for creating pooled Diesel connections,
//! running embedded migrations, auditing backend capabilities, and executing
//! the list and item queries behind the repository interface.

mod audit;
mod connection;
mod items;
mod lists;
mod migrations;

#[cfg(test)]
mod tests;

#[cfg(feature = "postgres")]
pub use self::audit::audit_postgres_features;
#[cfg(feature = "sqlite")]
pub use self::audit::audit_sqlite_features;
pub use self::{
    connection::{Backend, DbConnection, DbPool, MIGRATIONS, establish_pool},
    items::{create_item, list_items},
    lists::{create_list, create_list_with_item, delete_list, list_exists},
    migrations::{apply_migrations, run_migrations},
};
