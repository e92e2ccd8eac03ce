//! Row types for the `lists` and `items` tables.

use std::fmt;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of a to-do list, as it appears in `/lists/<id>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(i32);

impl ListId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self { Self(raw) }

    /// Return the raw database identifier.
    #[must_use]
    pub const fn get(self) -> i32 { self.0 }

    /// Path at which the list is rendered.
    #[must_use]
    pub fn url(self) -> String { format!("/lists/{}/", self.0) }

    /// Path that accepts new items for the list.
    #[must_use]
    pub fn add_item_url(self) -> String { format!("/lists/{}/add_item", self.0) }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A persisted list row.
#[derive(Queryable, Selectable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::schema::lists)]
pub struct List {
    /// Generated identifier.
    pub id: i32,
}

impl List {
    /// Typed identifier of this list.
    #[must_use]
    pub const fn list_id(&self) -> ListId { ListId(self.id) }
}

/// A persisted to-do item.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::items)]
pub struct Item {
    /// Generated identifier; ascending ids follow insertion order.
    pub id: i32,
    /// Item text as submitted (after trimming).
    pub text: String,
    /// Owning list.
    pub list_id: i32,
}

impl Item {
    /// Typed identifier of the owning list.
    #[must_use]
    pub const fn owner(&self) -> ListId { ListId(self.list_id) }
}

/// Insertable form of [`Item`].
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem<'a> {
    /// Item text.
    pub text: &'a str,
    /// Owning list.
    pub list_id: i32,
}
