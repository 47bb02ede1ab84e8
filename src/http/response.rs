//! Handler errors and their HTTP representation.
//!
//! Handlers return `Result<_, HandlerError>`. The error becomes a plain-text
//! response with a matching status, and the full message rides along in
//! the response extensions so the request middleware can log it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure message attached to error responses.
#[derive(Debug, Clone)]
pub struct HandlerFailure(pub String);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details stay in the logs.
        let body = if status.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, body).into_response();
        response
            .extensions_mut()
            .insert(HandlerFailure(self.to_string()));
        response
    }
}
