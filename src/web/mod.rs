//! HTTP surface of the to-do list application.
//!
//! The router maps the four public routes onto handlers in [`handlers`]. All
//! persistence goes through the [`ListStore`] held in [`AppState`], so tests
//! can drive the router with an in-memory store.

pub mod error;
pub mod handlers;
pub mod pages;
mod request_tracing;


use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

pub use self::error::WebError;
use crate::store::ListStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ListStore>,
}

impl AppState {
    /// Build state around a repository implementation.
    #[must_use]
    pub fn new(store: Arc<dyn ListStore>) -> Self { Self { store } }

    /// The repository shared by all requests.
    #[must_use]
    pub fn store(&self) -> &dyn ListStore { self.store.as_ref() }
}

/// Assemble the application router.
///
/// | Method | Path                        | Handler                          |
/// |--------|-----------------------------|----------------------------------|
/// | GET    | `/`                         | [`handlers::home_page`]          |
/// | POST   | `/lists/new`                | [`handlers::handle_submission`]  |
/// | GET    | `/lists/{list_id}/`         | [`handlers::view_list`]          |
/// | POST   | `/lists/{list_id}/add_item` | [`handlers::add_item`]           |
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home_page))
        .route("/lists/new", post(handlers::handle_submission))
        .route("/lists/{list_id}/", get(handlers::view_list))
        .route("/lists/{list_id}/add_item", post(handlers::add_item))
        .layer(from_fn(request_tracing::trace_request))
        .with_state(state)
}
