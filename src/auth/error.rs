use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("E-postadressen er allerede i bruk.")]
    DuplicateEmail,

    /// Unknown email and wrong password look the same to the client.
    #[error("Feil e-post eller passord.")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::Internal(ref e) => {
                error!(error = %e, "auth internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
