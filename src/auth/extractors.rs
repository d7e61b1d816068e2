use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::{debug, warn};

use super::dto::{MessageResponse, Session};
use super::repo_types::User;
use super::session::SessionKeys;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const NOT_LOGGED_IN: &str = "Ikke logget inn";

/// Any logged-in user. Page endpoints: anonymous requests are sent to the login page.
pub struct CurrentUser(pub Session);

/// A logged-in admin. Everyone else is sent to the login page.
pub struct AdminUser(pub Session);

/// Any logged-in user on a programmatic endpoint: anonymous requests get a 401 JSON body.
pub struct ApiUser(pub Session);

/// Session from the cookie, refreshed from the stored user row.
/// A token for a user that no longer exists counts as no session.
async fn session_of(parts: &Parts, state: &AppState) -> Result<Option<Session>, Response> {
    let Some(claimed) = SessionKeys::from_ref(state).from_headers(&parts.headers) else {
        return Ok(None);
    };

    let user = User::find_by_id(&state.db, claimed.user_id)
        .await
        .map_err(|e| crate::views::internal(e.context("session lookup")).into_response())?;

    match user {
        Some(user) => Ok(Some(Session {
            user_id: user.id,
            full_name: user.full_name,
            is_admin: user.is_admin,
        })),
        None => {
            warn!(user_id = %claimed.user_id, "session for unknown user ignored");
            Ok(None)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_of(parts, state).await? {
            Some(session) => Ok(CurrentUser(session)),
            None => {
                debug!(uri = %parts.uri, "no session, redirecting to login");
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_of(parts, state).await? {
            Some(session) if session.is_admin => Ok(AdminUser(session)),
            Some(session) => {
                warn!(user_id = %session.user_id, uri = %parts.uri, "non-admin denied");
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
            None => Err(Redirect::to(LOGIN_PATH).into_response()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_of(parts, state).await? {
            Some(session) => Ok(ApiUser(session)),
            None => {
                warn!(uri = %parts.uri, "unauthorized api call");
                Err((
                    StatusCode::UNAUTHORIZED,
                    Json(MessageResponse::new(NOT_LOGGED_IN)),
                )
                    .into_response())
            }
        }
    }
}
