//! Repository interface between request handlers and storage.
//!
//! Handlers only ever see [`ListStore`]; the Diesel-backed implementation is
//! used by the server and [`MemoryListStore`] backs handler tests.

mod diesel_store;
mod memory;

use async_trait::async_trait;
use diesel_async::pooled_connection::bb8::RunError;
use thiserror::Error;

pub use self::{diesel_store::DieselListStore, memory::MemoryListStore};
use crate::models::{Item, ListId};

/// Failures surfaced by a [`ListStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced list does not exist.
    #[error("list {0} does not exist")]
    ListNotFound(ListId),
    /// No pooled connection could be checked out.
    #[error("database pool unavailable: {0}")]
    Pool(#[from] RunError),
    /// A query failed.
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

/// Narrow persistence interface for lists and their items.
///
/// Ownership is enforced here: items can only be added to lists that exist,
/// and deleting a list deletes the items it owns.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Create a new, empty list.
    async fn create_list(&self) -> Result<ListId, StoreError>;

    /// Append an item to an existing list.
    ///
    /// Fails with [`StoreError::ListNotFound`] for unknown lists.
    async fn create_item(&self, list: ListId, text: &str) -> Result<Item, StoreError>;

    /// Items of a list in insertion order; empty for unknown lists.
    async fn list_items(&self, list: ListId) -> Result<Vec<Item>, StoreError>;

    /// Whether the list exists.
    async fn list_exists(&self, list: ListId) -> Result<bool, StoreError>;

    /// Delete a list and all of its items, returning `false` when the list
    /// was not there.
    async fn delete_list(&self, list: ListId) -> Result<bool, StoreError>;

    /// Create a list holding a single first item.
    async fn start_list(&self, text: &str) -> Result<(ListId, Item), StoreError> {
        let list = self.create_list().await?;
        let item = self.create_item(list, text).await?;
        Ok((list, item))
    }
}
