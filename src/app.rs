use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::state::AppState;
use crate::{auth, db, jobs, views};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(views::router())
        .merge(auth::router())
        .merge(jobs::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Schema, optional reset, then the admin seed. Runs once before serving.
pub async fn prepare_store(state: &AppState) -> anyhow::Result<()> {
    db::migrate(&state.db).await?;

    if state.config.reset_users_on_start {
        let removed = db::reset_users(&state.db).await?;
        warn!(removed, "RESET_USERS_ON_START is set; all accounts and their jobs were deleted");
    }

    let seed = &state.config.admin;
    auth::services::bootstrap_admin(&state.db, seed).await?;
    if seed.password_generated {
        warn!(
            email = %seed.email,
            password = %seed.password,
            "ADMIN_PASSWORD not set; generated a password for this run"
        );
    }
    Ok(())
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
