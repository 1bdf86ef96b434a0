//! Domain service for the calculator
//!
//! Runs the tokenize → parse → evaluate pipeline for one expression.

use tracing::{Span, debug, field, instrument};

use super::error::{DomainError, LexError};
use super::eval::evaluate;
use super::lexer::tokenize;
use super::parser::parse;
use super::token::SpannedToken;
use crate::config::CalculatorConfig;

/// Stateless evaluation service.
///
/// Holds only the resource limits; every call works on its own input, so a
/// single instance can be shared across any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Service {
    max_expression_len: usize,
    max_depth: usize,
}

impl Default for Service {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl Service {
    #[must_use]
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            max_expression_len: config.max_expression_len,
            max_depth: config.max_depth,
        }
    }

    /// Evaluate `expression` to a finite number.
    ///
    /// The input is fully lexed before parsing and fully parsed before
    /// evaluation, so lex errors take priority over parse errors, and parse
    /// errors over evaluation errors.
    ///
    /// # Errors
    /// Returns the single [`DomainError`] that classifies why `expression`
    /// has no value.
    #[instrument(skip(self, expression), fields(len = field::Empty))]
    pub fn evaluate(&self, expression: &str) -> Result<f64, DomainError> {
        self.run(expression)
            .inspect(|value| debug!(value, "expression evaluated"))
            .inspect_err(|e| debug!(code = e.code(), error = %e, "expression rejected"))
    }

    fn run(&self, expression: &str) -> Result<f64, DomainError> {
        let len = expression.chars().count();
        Span::current().record("len", len);
        if len > self.max_expression_len {
            return Err(LexError::TooLong {
                len,
                max: self.max_expression_len,
            }
            .into());
        }

        let tokens = tokenize(expression).collect::<Result<Vec<SpannedToken>, _>>()?;
        let expr = parse(tokens, self.max_depth)?;
        Ok(evaluate(&expr)?)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::float_cmp)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::error::{ErrorKind, EvalError, ParseError};
    use crate::domain::token::{Operator, Token};

    fn eval(input: &str) -> Result<f64, DomainError> {
        Service::default().evaluate(input)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval("10/0").unwrap_err();
        assert_eq!(err, DomainError::Eval(EvalError::DivisionByZero));
        assert_eq!(err.to_string(), "division by zero");
    }

    #[test]
    fn test_missing_operand() {
        let err = eval("2+").unwrap_err();
        assert_eq!(err, DomainError::Parse(ParseError::UnexpectedEnd));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_empty() {
        assert_eq!(eval(""), Err(DomainError::Parse(ParseError::Empty)));
        assert_eq!(eval(" \t "), Err(DomainError::Parse(ParseError::Empty)));
    }

    #[test]
    fn test_unary_minus_on_both_operands() {
        assert_eq!(eval("-3*-2"), Ok(6.0));
        assert_eq!(eval("-3+2"), Ok(-1.0));
        assert_eq!(eval("3*-2"), Ok(-6.0));
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(
            eval("(1+2"),
            Err(DomainError::Parse(ParseError::UnbalancedParentheses))
        );
        assert_eq!(eval("(1+2").unwrap_err().to_string(), "unbalanced parentheses");
    }

    #[test]
    fn test_two_decimal_points_never_truncate() {
        let err = eval("1.2.3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lex);
        assert_eq!(err.to_string(), "malformed number '1.2.3' at position 0");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(eval(".5 + .25"), Ok(0.75));
        assert_eq!(eval("7/2"), Ok(3.5));
    }

    #[test]
    fn test_zero_result_is_a_result() {
        assert_eq!(eval("2-2"), Ok(0.0));
        assert_eq!(eval("0"), Ok(0.0));
    }

    #[test]
    fn test_lex_error_wins_over_parse_error() {
        let err = eval(") + $").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lex);
    }

    #[test]
    fn test_parse_error_wins_over_eval_error() {
        assert_eq!(
            eval("1/0)"),
            Err(DomainError::Parse(ParseError::UnexpectedToken {
                token: Token::RightParen,
                pos: 3
            }))
        );
        assert_eq!(
            eval("(1/0"),
            Err(DomainError::Parse(ParseError::UnbalancedParentheses))
        );
        assert_eq!(
            eval("1/0 2"),
            Err(DomainError::Parse(ParseError::UnexpectedToken {
                token: Token::Number(2.0),
                pos: 4
            }))
        );
    }

    #[test]
    fn test_operator_sequence() {
        assert_eq!(
            eval("2+*3"),
            Err(DomainError::Parse(ParseError::UnexpectedToken {
                token: Token::Operator(Operator::Star),
                pos: 2
            }))
        );
    }

    #[test]
    fn test_huge_literal_overflows() {
        let input = "9".repeat(400);
        assert_eq!(eval(&input), Err(DomainError::Eval(EvalError::Overflow)));
    }

    #[test]
    fn test_input_length_cap() {
        let service = Service::new(&CalculatorConfig {
            max_expression_len: 5,
            ..CalculatorConfig::default()
        });
        assert_eq!(service.evaluate("1+2+3"), Ok(6.0));
        assert_eq!(
            service.evaluate("1+2+34"),
            Err(DomainError::Lex(LexError::TooLong { len: 6, max: 5 }))
        );
    }

    #[test]
    fn test_length_cap_counts_characters_not_bytes() {
        let service = Service::new(&CalculatorConfig {
            max_expression_len: 3,
            ..CalculatorConfig::default()
        });
        // Three characters, six bytes: passes the cap, then fails lexing.
        let err = service.evaluate("\u{e9}\u{e9}\u{e9}").unwrap_err();
        assert!(matches!(err, DomainError::Lex(LexError::InvalidCharacter { .. })));
    }

    #[test]
    fn test_depth_cap_from_config() {
        let service = Service::new(&CalculatorConfig {
            max_depth: 2,
            ..CalculatorConfig::default()
        });
        assert_eq!(service.evaluate("((1))"), Ok(1.0));
        assert_eq!(
            service.evaluate("(((1)))"),
            Err(DomainError::Parse(ParseError::TooComplex { max_depth: 2 }))
        );
    }

    #[test]
    fn test_binary_garbage_is_classified() {
        let garbage = "\u{0}\u{1}\u{fffd}\u{7f}";
        assert_eq!(eval(garbage).unwrap_err().kind(), ErrorKind::Lex);
    }

    #[test]
    fn test_deterministic() {
        for input in ["2+3*4", "10/0", "1.2.3", "(1+2", "", "-(-(.5))*8"] {
            assert_eq!(eval(input), eval(input), "input {input:?}");
        }
    }

    #[test]
    fn test_reparenthesized_expression_evaluates_identically() {
        let inputs = [
            "1+2*3-4/5",
            "-1.5*-2+3/-4",
            "((1+2)*(3-4))/5",
            "8/4/2-1-1",
            "-(2+3)*4-.25",
            "100-99.5*2/7+-3",
        ];
        for input in inputs {
            let tokens: Vec<SpannedToken> = tokenize(input).collect::<Result<_, _>>().unwrap();
            let tree = parse(tokens, 100).unwrap();
            let explicit = tree.to_string();
            assert_eq!(eval(input), eval(&explicit), "{input} vs {explicit}");
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_rejection_is_logged_with_code() {
        let _ = eval("10/0");
        assert!(logs_contain("EVAL_DIVISION_BY_ZERO"));
        assert!(logs_contain("expression rejected"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_span_records_length_in_characters() {
        // Four characters, eight bytes.
        let _ = eval("\u{e9}\u{e9}\u{e9}\u{e9}");
        assert!(logs_contain("len=4"));
        assert!(!logs_contain("len=8"));
    }

    #[test]
    fn test_long_operator_chain_on_a_small_stack() {
        let service = Service::new(&CalculatorConfig {
            max_expression_len: 100_000,
            ..CalculatorConfig::default()
        });
        let input = "1+".repeat(49_999) + "1";

        let result = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || service.evaluate(&input))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(result, Ok(50_000.0));
    }

    #[test]
    fn test_configured_maxima_on_a_small_stack() {
        use crate::config::{MAX_DEPTH_LIMIT, MAX_EXPRESSION_LEN_LIMIT};

        let config = CalculatorConfig {
            max_expression_len: MAX_EXPRESSION_LEN_LIMIT,
            max_depth: MAX_DEPTH_LIMIT,
        };
        assert!(config.validate().is_ok());
        let service = Service::new(&config);

        let nested = format!(
            "{}1{}",
            "(".repeat(MAX_DEPTH_LIMIT),
            ")".repeat(MAX_DEPTH_LIMIT)
        );
        let negated = format!("{}1", "-".repeat(MAX_DEPTH_LIMIT));
        let chain = "1*".repeat(4_999) + "1";
        assert!(chain.len() <= MAX_EXPRESSION_LEN_LIMIT);

        let results = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                [nested, negated, chain].map(|input| service.evaluate(&input))
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(results, [Ok(1.0), Ok(1.0), Ok(1.0)]);
    }

    #[test]
    fn test_shared_across_threads() {
        let service = Arc::new(Service::default());
        std::thread::scope(|scope| {
            for i in 0..8u32 {
                let service = Arc::clone(&service);
                scope.spawn(move || {
                    let input = format!("{i}*2+1");
                    assert_eq!(service.evaluate(&input), Ok(f64::from(i * 2 + 1)));
                });
            }
        });
    }
}
