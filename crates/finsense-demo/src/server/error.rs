use crate::models::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use finsense_core::Error;

/// Error returned by API handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request itself is unusable
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(Error::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
