use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::dto::MessageResponse;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Ugyldig forespørsel: {0}")]
    MalformedBody(String),

    #[error("Beskrivelse mangler.")]
    EmptyDescription,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let status = match self {
            JobError::MalformedBody(_) | JobError::EmptyDescription => StatusCode::BAD_REQUEST,
            JobError::Internal(ref e) => {
                error!(error = %e, "job internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
