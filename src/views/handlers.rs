use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use tracing::instrument;

use crate::{
    auth::{
        extractors::{AdminUser, CurrentUser},
        repo_types::User,
    },
    jobs::services::all_jobs,
    state::AppState,
    views::{html, internal},
};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/admin", get(admin))
}

pub async fn index() -> Html<String> {
    html::index()
}

/// Greeting only; rendered from the session snapshot without touching the store.
pub async fn dashboard(CurrentUser(session): CurrentUser) -> Html<String> {
    html::dashboard(&session.full_name)
}

/// Every user and every job, unfiltered.
#[instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn admin(
    State(state): State<AppState>,
    AdminUser(session): AdminUser,
) -> Result<Html<String>, (StatusCode, String)> {
    let users = User::list_all(&state.db).await.map_err(internal)?;
    let jobs = all_jobs(&state.db, &state.config.display_timezone)
        .await
        .map_err(internal)?;
    Ok(html::admin(&users, &jobs))
}
