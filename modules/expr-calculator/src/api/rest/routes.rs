//! Route registration for the calculator module

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use utoipa::OpenApi;

use super::dto::{ErrorResponse, EvaluateRequest, EvaluateResponse};
use super::handlers;
use crate::domain::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "Expression Calculator", description = "Arithmetic expression evaluation"),
    paths(handlers::evaluate),
    components(schemas(EvaluateRequest, EvaluateResponse, ErrorResponse)),
    tags((name = "calculator", description = "Expression evaluation"))
)]
pub struct ApiDoc;

/// Register all REST routes for the calculator module.
///
/// * `POST /evaluate` - evaluate an expression
/// * `GET /openapi.json` - `OpenAPI` document for this API
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/evaluate", post(handlers::evaluate))
        .route("/openapi.json", get(handlers::openapi_json))
        .layer(Extension(service))
}
