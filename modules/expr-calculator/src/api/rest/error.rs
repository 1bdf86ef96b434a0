use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use super::dto::ErrorResponse;
use crate::domain::{DomainError, ErrorKind};

/// Error returned by REST handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    InvalidBody { status: StatusCode, detail: String },
}

/// HTTP status for a domain failure: malformed input is a bad request, a
/// well-formed expression without a finite value is unprocessable.
#[must_use]
pub fn domain_error_status(e: &DomainError) -> StatusCode {
    match e.kind() {
        ErrorKind::Lex | ErrorKind::Parse => StatusCode::BAD_REQUEST,
        ErrorKind::Eval => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(e) => domain_error_status(e),
            Self::InvalidBody { status, .. } => *status,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Domain(e) => e.to_string(),
            Self::InvalidBody { detail, .. } => format!("invalid request body: {detail}"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        Self::InvalidBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
