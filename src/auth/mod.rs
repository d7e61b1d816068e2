use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
