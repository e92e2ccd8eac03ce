//! [`ListStore`] over the pooled Diesel connection.

use async_trait::async_trait;

use super::{ListStore, StoreError};
use crate::{
    db::{self, DbPool},
    models::{Item, ListId},
};

/// Repository backed by the application database pool.
#[derive(Clone)]
pub struct DieselListStore {
    pool: DbPool,
}

impl DieselListStore {
    /// Wrap an established pool. Migrations must already have run.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self { Self { pool } }
}

#[async_trait]
impl ListStore for DieselListStore {
    async fn create_list(&self) -> Result<ListId, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(db::create_list(&mut conn).await?)
    }

    async fn create_item(&self, list: ListId, text: &str) -> Result<Item, StoreError> {
        let mut conn = self.pool.get().await?;
        db::create_item(&mut conn, list, text)
            .await?
            .ok_or(StoreError::ListNotFound(list))
    }

    async fn list_items(&self, list: ListId) -> Result<Vec<Item>, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(db::list_items(&mut conn, list).await?)
    }

    async fn list_exists(&self, list: ListId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(db::list_exists(&mut conn, list).await?)
    }

    async fn delete_list(&self, list: ListId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(db::delete_list(&mut conn, list).await?)
    }

    async fn start_list(&self, text: &str) -> Result<(ListId, Item), StoreError> {
        let mut conn = self.pool.get().await?;
        Ok(db::create_list_with_item(&mut conn, text).await?)
    }
}
