//! Core library for the superlists to-do service.
//!
//! Each to-do list lives at its own URL (`/lists/<id>/`). The crate exposes
//! the database layer, the [`store::ListStore`] repository, the axum router
//! and the server entry points used by the binary. Only one database backend
//! (either `sqlite` or `postgres`) should be enabled at a time.

pub mod db;
pub mod models;
pub mod schema;
pub mod server;
pub mod store;
pub mod web;
