//! Domain layer for the calculator module
//!
//! Tokenizer, parser, evaluator and the error taxonomy they share.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod service;
pub mod token;

pub use error::{DomainError, ErrorKind, EvalError, LexError, ParseError};
pub use service::Service;
