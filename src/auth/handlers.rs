use axum::{
    extract::{FromRef, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Form, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        error::AuthError,
        extractors::LOGIN_PATH,
        services,
        session::SessionKeys,
    },
    state::AppState,
    views::html,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

pub async fn register_form() -> Html<String> {
    html::register_form()
}

pub async fn login_form() -> Html<String> {
    html::login_form()
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AuthError> {
    services::register(&state.db, form).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AuthError> {
    let session = services::authenticate(&state.db, &form.email, &form.password).await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(&session)?;

    Ok((
        [(header::SET_COOKIE, keys.issue_cookie(&token))],
        Redirect::to(services::landing_path(&session)),
    ))
}

/// Clears the session whether or not one was present.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let keys = SessionKeys::from_ref(&state);
    info!("logout");
    (
        [(header::SET_COOKIE, keys.clear_cookie())],
        html::logged_out(),
    )
}
