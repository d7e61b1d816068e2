use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::MessageResponse,
        extractors::{ApiUser, CurrentUser},
    },
    jobs::{dto::OrderRequest, error::JobError, services},
    state::AppState,
    views::{html, internal},
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(order))
        .route("/thank_you", get(thank_you))
}

/// POST /order {"description": "..."}
#[instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn order(
    State(state): State<AppState>,
    ApiUser(session): ApiUser,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, JobError> {
    let Json(req) = body.map_err(|e| {
        warn!(error = %e, "malformed order body");
        JobError::MalformedBody(e.body_text())
    })?;

    services::submit(&state.db, &session, &req.description).await?;
    Ok(Json(MessageResponse::new(services::ORDER_ACCEPTED)))
}

/// The caller's own jobs, newest last.
#[instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn thank_you(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Html<String>, (StatusCode, String)> {
    let jobs = services::jobs_for_user(&state.db, session.user_id, &state.config.display_timezone)
        .await
        .map_err(internal)?;
    Ok(html::thank_you(&jobs))
}
