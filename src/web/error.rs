//! Error type returned by request handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{models::ListId, store::StoreError};

/// Failures a handler can report to the client.
#[derive(Debug, Error)]
pub enum WebError {
    /// The list addressed by the URL does not exist.
    #[error("list {0} not found")]
    ListNotFound(ListId),
    /// The repository failed.
    #[error("storage failure: {0}")]
    Store(StoreError),
    /// A page template failed to render.
    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ListNotFound(list) => Self::ListNotFound(list),
            other => Self::Store(other),
        }
    }
}

impl WebError {
    /// HTTP status reported for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::ListNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            (status, "Internal server error").into_response()
        } else {
            tracing::debug!(error = %self, "request rejected");
            (status, "Not found").into_response()
        }
    }
}
