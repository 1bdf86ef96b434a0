//! Error taxonomy for expression evaluation.
//!
//! Every input ends either in a finite number or in exactly one of these
//! errors. None of them is recovered from inside the pipeline.

use super::token::Token;

/// Failure while turning raw text into tokens.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid character '{}' at position {pos}", .ch.escape_debug())]
    InvalidCharacter { ch: char, pos: usize },

    #[error("malformed number '{literal}' at position {pos}")]
    MalformedNumber { literal: String, pos: usize },

    #[error("expression too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },
}

/// Failure while matching tokens against the grammar.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("unexpected token '{token}' at position {pos}")]
    UnexpectedToken { token: Token, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("expression too complex")]
    TooComplex { max_depth: usize },
}

/// Failure while computing the value of a well-formed expression.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow")]
    Overflow,
}

/// Coarse classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Eval,
}

/// Umbrella error returned by the evaluation [`Service`](super::service::Service).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lex(_) => ErrorKind::Lex,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Eval(_) => ErrorKind::Eval,
        }
    }

    /// Stable machine-readable code, used in logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Lex(LexError::InvalidCharacter { .. }) => "LEX_INVALID_CHARACTER",
            Self::Lex(LexError::MalformedNumber { .. }) => "LEX_MALFORMED_NUMBER",
            Self::Lex(LexError::TooLong { .. }) => "LEX_EXPRESSION_TOO_LONG",
            Self::Parse(ParseError::Empty) => "PARSE_EMPTY_EXPRESSION",
            Self::Parse(ParseError::UnbalancedParentheses) => "PARSE_UNBALANCED_PARENTHESES",
            Self::Parse(ParseError::UnexpectedToken { .. }) => "PARSE_UNEXPECTED_TOKEN",
            Self::Parse(ParseError::UnexpectedEnd) => "PARSE_UNEXPECTED_END",
            Self::Parse(ParseError::TooComplex { .. }) => "PARSE_TOO_COMPLEX",
            Self::Eval(EvalError::DivisionByZero) => "EVAL_DIVISION_BY_ZERO",
            Self::Eval(EvalError::Overflow) => "EVAL_NUMERIC_OVERFLOW",
        }
    }
}
