pub mod handlers;
pub mod html;

use crate::state::AppState;
use axum::{http::StatusCode, Router};
use tracing::error;

pub fn router() -> Router<AppState> {
    handlers::page_routes()
}

/// Plain-text 500 for page endpoints.
pub(crate) fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "page failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}
