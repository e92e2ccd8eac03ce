//! Askama page models for the home and list views.
//!
//! Both pages extend `templates/base.html`, which owns the title, the heading
//! and the new-item form. The element ids (`id_new_item`, `id_list_table`,
//! `id_error`) are relied upon by the browser-level tests.

use askama::Template;

use crate::models::{Item, ListId};

/// Message shown when an empty or whitespace-only item is submitted.
pub const EMPTY_ITEM_ERROR: &str = "You can't have an empty list item";

/// Path the home page form posts to.
pub const NEW_LIST_URL: &str = "/lists/new";

/// The landing page with a form that starts a new list.
#[derive(Template, Debug)]
#[template(path = "home.html")]
pub struct HomePage {
    action: &'static str,
    error: Option<&'static str>,
}

impl HomePage {
    /// A blank home page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            action: NEW_LIST_URL,
            error: None,
        }
    }

    /// The home page re-rendered after an empty submission.
    #[must_use]
    pub const fn with_empty_item_error() -> Self {
        Self {
            action: NEW_LIST_URL,
            error: Some(EMPTY_ITEM_ERROR),
        }
    }
}

impl Default for HomePage {
    fn default() -> Self { Self::new() }
}

/// One numbered row of the list table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// 1-based position in the list.
    pub number: usize,
    /// Item text.
    pub text: String,
}

/// Number items from 1 in the order given.
#[must_use]
pub fn numbered_rows(items: Vec<Item>) -> Vec<ListRow> {
    items
        .into_iter()
        .zip(1..)
        .map(|(item, number)| ListRow {
            number,
            text: item.text,
        })
        .collect()
}

/// A single list with its items and a form that appends to it.
#[derive(Template, Debug)]
#[template(path = "list.html")]
pub struct ListPage {
    action: String,
    list_url: String,
    error: Option<&'static str>,
    rows: Vec<ListRow>,
}

impl ListPage {
    /// Render `items` as the contents of `list`.
    #[must_use]
    pub fn new(list: ListId, items: Vec<Item>) -> Self {
        Self {
            action: list.add_item_url(),
            list_url: list.url(),
            error: None,
            rows: numbered_rows(items),
        }
    }

    /// Attach the empty-item validation message.
    #[must_use]
    pub fn with_empty_item_error(mut self) -> Self {
        self.error = Some(EMPTY_ITEM_ERROR);
        self
    }
}
