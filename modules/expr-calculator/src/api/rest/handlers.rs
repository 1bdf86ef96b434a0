use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};

use super::dto::{ErrorResponse, EvaluateRequest, EvaluateResponse};
use super::error::ApiError;
use super::routes::ApiDoc;
use crate::domain::Service;

/// Evaluate an arithmetic expression.
#[utoipa::path(
    post,
    path = "/evaluate",
    tag = "calculator",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Expression value", body = EvaluateResponse),
        (status = 400, description = "Malformed expression or request body", body = ErrorResponse),
        (status = 422, description = "Expression has no finite value", body = ErrorResponse),
    )
)]
#[allow(clippy::unused_async)]
pub async fn evaluate(
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let Json(req) = payload?;
    let result = svc.evaluate(&req.expression)?;
    Ok(Json(EvaluateResponse { result }))
}

#[allow(clippy::unused_async)]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi as _;
    Json(ApiDoc::openapi())
}
