//! In-process [`ListStore`] used by handler tests and embedders that do not
//! need durability.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

use super::{ListStore, StoreError};
use crate::models::{Item, ListId};

#[derive(Default)]
struct State {
    next_list: i32,
    next_item: i32,
    lists: BTreeMap<ListId, Vec<Item>>,
}

/// Mutex-guarded map of lists to their items.
///
/// Identifiers start at 1 and are never reused, matching the database
/// behaviour.
#[derive(Default)]
pub struct MemoryListStore {
    state: Mutex<State>,
}

impl MemoryListStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn create_list(&self) -> Result<ListId, StoreError> {
        let mut state = self.state();
        state.next_list += 1;
        let list = ListId::new(state.next_list);
        state.lists.insert(list, Vec::new());
        Ok(list)
    }

    async fn create_item(&self, list: ListId, text: &str) -> Result<Item, StoreError> {
        let mut guard = self.state();
        let state = &mut *guard;
        let items = state
            .lists
            .get_mut(&list)
            .ok_or(StoreError::ListNotFound(list))?;
        state.next_item += 1;
        let item = Item {
            id: state.next_item,
            text: text.to_owned(),
            list_id: list.get(),
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn list_items(&self, list: ListId) -> Result<Vec<Item>, StoreError> {
        Ok(self.state().lists.get(&list).cloned().unwrap_or_default())
    }

    async fn list_exists(&self, list: ListId) -> Result<bool, StoreError> {
        Ok(self.state().lists.contains_key(&list))
    }

    async fn delete_list(&self, list: ListId) -> Result<bool, StoreError> {
        Ok(self.state().lists.remove(&list).is_some())
    }
}
