#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Expression Calculator Module
//!
//! Evaluates free-form arithmetic expressions (`+ - * /`, parentheses,
//! decimal literals, unary minus) and exposes the evaluation over REST.
//!
//! ## Architecture
//!
//! - `domain/lexer.rs` - tokenizer
//! - `domain/parser.rs` - recursive-descent parser producing `domain::ast::Expr`
//! - `domain/eval.rs` - evaluator with division-by-zero and overflow checks
//! - `domain/service.rs` - the tokenize → parse → evaluate pipeline
//! - `api/rest/` - `POST /evaluate` adapter and `OpenAPI` document

pub mod api;
pub mod config;
pub mod domain;

pub use api::rest::register_routes;
pub use config::CalculatorConfig;
pub use domain::{DomainError, Service};
