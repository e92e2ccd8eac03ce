//! Request handlers for the home page and individual lists.
//!
//! Successful submissions answer with `303 See Other` so a browser reload
//! never re-posts the form. Empty submissions re-render the originating page
//! with `400 Bad Request` and leave storage untouched.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    AppState,
    WebError,
    pages::{HomePage, ListPage},
};
use crate::models::ListId;

/// Form body posted by both the home page and list pages.
#[derive(Debug, Default, Deserialize)]
pub struct ItemForm {
    /// Raw text of the new item. Absent when the field was not submitted.
    pub item_text: Option<String>,
}

impl ItemForm {
    /// Submitted text with surrounding whitespace removed, or `None` when
    /// nothing meaningful was entered.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.item_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

fn render(page: &impl Template) -> Result<Html<String>, WebError> { Ok(Html(page.render()?)) }

/// `GET /`: the landing page.
///
/// # Errors
///
/// Returns [`WebError::Render`] if the template fails.
pub async fn home_page() -> Result<Html<String>, WebError> { render(&HomePage::new()) }

/// `POST /lists/new`: start a list holding the submitted item and redirect
/// to it.
///
/// # Errors
///
/// Returns [`WebError`] if storage or rendering fails.
pub async fn handle_submission(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<ItemForm>,
) -> Result<Response, WebError> {
    let Some(text) = form.text() else {
        warn!("rejected empty item for a new list");
        let page = render(&HomePage::with_empty_item_error())?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    };
    let (list, item) = state.store().start_list(text).await?;
    debug!(list_id = %list, item_id = item.id, "started new list");
    Ok(Redirect::to(&list.url()).into_response())
}

/// `GET /lists/{list_id}/`: show a list and its items.
///
/// # Errors
///
/// Returns [`WebError::ListNotFound`] for unknown lists.
pub async fn view_list(
    State(state): State<AppState>,
    Path(list): Path<ListId>,
) -> Result<Html<String>, WebError> {
    let store = state.store();
    if !store.list_exists(list).await? {
        return Err(WebError::ListNotFound(list));
    }
    let items = store.list_items(list).await?;
    render(&ListPage::new(list, items))
}

/// `POST /lists/{list_id}/add_item`: append an item and redirect back to the
/// list.
///
/// # Errors
///
/// Returns [`WebError::ListNotFound`] for unknown lists.
pub async fn add_item(
    State(state): State<AppState>,
    Path(list): Path<ListId>,
    axum::Form(form): axum::Form<ItemForm>,
) -> Result<Response, WebError> {
    let store = state.store();
    let Some(text) = form.text() else {
        if !store.list_exists(list).await? {
            return Err(WebError::ListNotFound(list));
        }
        warn!(list_id = %list, "rejected empty item");
        let items = store.list_items(list).await?;
        let page = render(&ListPage::new(list, items).with_empty_item_error())?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    };
    let item = store.create_item(list, text).await?;
    debug!(list_id = %list, item_id = item.id, "added item");
    Ok(Redirect::to(&list.url()).into_response())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ItemForm;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   \t"), None)]
    #[case(Some("Buy milk"), Some("Buy milk"))]
    #[case(Some("  Buy milk \n"), Some("Buy milk"))]
    fn item_text_is_trimmed(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let form = ItemForm {
            item_text: raw.map(str::to_owned),
        };
        assert_eq!(form.text(), expected);
    }
}
