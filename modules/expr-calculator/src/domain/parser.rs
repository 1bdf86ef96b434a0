//! Recursive-descent parser.
//!
//! Grammar, lowest to highest precedence, `+ - * /` left-associative:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := '-' unary | primary
//! primary    := NUMBER | '(' expression ')'
//! ```

use std::iter::Peekable;

use super::ast::Expr;
use super::error::ParseError;
use super::token::{Operator, SpannedToken, Token};

/// Parse a complete token sequence into an [`Expr`].
///
/// `max_depth` bounds the combined nesting of parentheses and unary minus.
///
/// # Errors
/// Returns [`ParseError`] when the tokens do not form exactly one expression.
pub fn parse<I>(tokens: I, max_depth: usize) -> Result<Expr, ParseError>
where
    I: IntoIterator<Item = SpannedToken>,
{
    Parser::new(tokens.into_iter(), max_depth).parse()
}

struct Parser<I: Iterator<Item = SpannedToken>> {
    tokens: Peekable<I>,
    depth: usize,
    max_depth: usize,
    open_parens: usize,
}

impl<I: Iterator<Item = SpannedToken>> Parser<I> {
    fn new(tokens: I, max_depth: usize) -> Self {
        Self {
            tokens: tokens.peekable(),
            depth: 0,
            max_depth,
            open_parens: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, ParseError> {
        if self.tokens.peek().is_none() {
            return Err(ParseError::Empty);
        }

        let expr = self.expression()?;

        match self.tokens.next() {
            None => Ok(expr),
            Some(SpannedToken { token, pos }) => Err(ParseError::UnexpectedToken { token, pos }),
        }
    }

    /// Consume the next token if it is one of `ops`.
    fn next_operator(&mut self, ops: [Operator; 2]) -> Option<Operator> {
        self.tokens
            .next_if(|t| matches!(t.token, Token::Operator(op) if ops.contains(&op)))
            .and_then(|t| match t.token {
                Token::Operator(op) => Some(op),
                _ => None,
            })
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        while let Some(op) = self.next_operator([Operator::Plus, Operator::Minus]) {
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.next_operator([Operator::Star, Operator::Slash]) {
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self
            .tokens
            .next_if(|t| t.token == Token::Operator(Operator::Minus))
            .is_some()
        {
            self.descend()?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::negate(operand));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some(SpannedToken { token, pos }) = self.tokens.next() else {
            return Err(self.end_of_input());
        };

        match token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::LeftParen => {
                self.descend()?;
                self.open_parens += 1;
                let inner = self.expression()?;
                match self.tokens.next() {
                    Some(SpannedToken {
                        token: Token::RightParen,
                        ..
                    }) => {}
                    Some(SpannedToken { token, pos }) => {
                        return Err(ParseError::UnexpectedToken { token, pos });
                    }
                    None => return Err(ParseError::UnbalancedParentheses),
                }
                self.open_parens -= 1;
                self.depth -= 1;
                Ok(inner)
            }
            Token::RightParen if self.open_parens == 0 => Err(ParseError::UnbalancedParentheses),
            Token::Operator(_) | Token::RightParen => {
                Err(ParseError::UnexpectedToken { token, pos })
            }
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::TooComplex {
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// Running out of tokens inside an open group is reported as a missing
    /// `)` rather than a missing operand.
    fn end_of_input(&self) -> ParseError {
        if self.open_parens > 0 {
            ParseError::UnbalancedParentheses
        } else {
            ParseError::UnexpectedEnd
        }
    }
}
