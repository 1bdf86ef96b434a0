//! REST DTOs for the calculator module
//!
//! These types are transport-specific (serde + utoipa for REST/OpenAPI) and
//! match the wire contract of the calculator client.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Expression submitted for evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EvaluateRequest {
    /// Free-form arithmetic expression: digits, `.`, `+ - * /` and parentheses.
    /// A missing field is treated as an empty expression.
    #[serde(default)]
    pub expression: String,
}

/// Successful evaluation.
///
/// `result` is always serialized, including when it is zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluateResponse {
    pub result: f64,
}

/// Failed evaluation or malformed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short human-readable rendering of the failure, e.g. `division by zero`.
    pub error: String,
}
