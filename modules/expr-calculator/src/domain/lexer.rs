//! Tokenizer: raw expression text to [`SpannedToken`]s.
//!
//! The lexer is a lazy, one-shot iterator. It yields at most one error and
//! then stops; restarting means calling [`tokenize`] again on the input
//! string.

use std::iter::{Enumerate, FusedIterator, Peekable};
use std::str::Chars;

use super::error::LexError;
use super::token::{Operator, SpannedToken, Token};

/// Start tokenizing `input`.
#[must_use]
pub fn tokenize(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

#[derive(Debug)]
pub struct Lexer<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().enumerate().peekable(),
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .chars
            .next_if(|&(_, c)| matches!(c, ' ' | '\t' | '\r' | '\n'))
            .is_some()
        {}
    }

    /// Consume a run of digits and dots starting at `pos` and validate it as
    /// `digits [ '.' digits ]` or `'.' digits`.
    fn number(&mut self, pos: usize) -> Result<SpannedToken, LexError> {
        let mut literal = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit() || c == '.') {
            literal.push(c);
        }

        if !is_well_formed_number(&literal) {
            return Err(LexError::MalformedNumber { literal, pos });
        }

        let normalized = if literal.starts_with('.') {
            format!("0{literal}")
        } else {
            literal.clone()
        };

        // Overflowing literals parse to infinity; the evaluator rejects them.
        normalized
            .parse::<f64>()
            .map(|value| SpannedToken::new(Token::Number(value), pos))
            .map_err(|_| LexError::MalformedNumber { literal, pos })
    }
}

fn is_well_formed_number(literal: &str) -> bool {
    match literal.split_once('.') {
        None => !literal.is_empty(),
        Some((int_part, frac_part)) => {
            !frac_part.is_empty()
                && frac_part.bytes().all(|b| b.is_ascii_digit())
                && int_part.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<SpannedToken, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.skip_whitespace();
        let &(pos, c) = self.chars.peek()?;

        let result = if c.is_ascii_digit() || c == '.' {
            self.number(pos)
        } else {
            self.chars.next();
            match c {
                '(' => Ok(SpannedToken::new(Token::LeftParen, pos)),
                ')' => Ok(SpannedToken::new(Token::RightParen, pos)),
                _ => Operator::from_char(c)
                    .map(|op| SpannedToken::new(Token::Operator(op), pos))
                    .ok_or(LexError::InvalidCharacter { ch: c, pos }),
            }
        };

        self.failed = result.is_err();
        Some(result)
    }
}

impl FusedIterator for Lexer<'_> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Result<Vec<Token>, LexError> {
        tokenize(input).map(|t| t.map(|t| t.token)).collect()
    }

    #[test]
    fn test_operators_and_parens() {
        let got = tokens("(1 + 2) * 3 / 4 - 5").unwrap();
        assert_eq!(
            got,
            vec![
                Token::LeftParen,
                Token::Number(1.0),
                Token::Operator(Operator::Plus),
                Token::Number(2.0),
                Token::RightParen,
                Token::Operator(Operator::Star),
                Token::Number(3.0),
                Token::Operator(Operator::Slash),
                Token::Number(4.0),
                Token::Operator(Operator::Minus),
                Token::Number(5.0),
            ]
        );
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(tokens("2.75").unwrap(), vec![Token::Number(2.75)]);
        assert_eq!(tokens(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokens("007").unwrap(), vec![Token::Number(7.0)]);
    }

    #[test]
    fn test_minus_is_never_part_of_a_literal() {
        assert_eq!(
            tokens("-3").unwrap(),
            vec![Token::Operator(Operator::Minus), Token::Number(3.0)]
        );
    }

    #[test]
    fn test_positions_are_char_offsets() {
        let spans: Vec<usize> = tokenize(" 12 +\t( 3)")
            .map(|t| t.unwrap().pos)
            .collect();
        assert_eq!(spans, vec![1, 4, 6, 8, 9]);
    }

    #[test]
    fn test_whitespace_only_yields_nothing() {
        assert!(tokens("").unwrap().is_empty());
        assert!(tokens(" \t\r\n ").unwrap().is_empty());
    }

    #[test]
    fn test_two_decimal_points_fail() {
        let err = tokens("1.2.3").unwrap_err();
        assert_eq!(
            err,
            LexError::MalformedNumber {
                literal: "1.2.3".to_owned(),
                pos: 0
            }
        );
    }

    #[test]
    fn test_bare_and_trailing_dots_fail() {
        assert!(matches!(
            tokens(".").unwrap_err(),
            LexError::MalformedNumber { pos: 0, .. }
        ));
        assert!(matches!(
            tokens("2 + 5.").unwrap_err(),
            LexError::MalformedNumber { pos: 4, .. }
        ));
        assert!(matches!(
            tokens("..5").unwrap_err(),
            LexError::MalformedNumber { .. }
        ));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            tokens("2 + x").unwrap_err(),
            LexError::InvalidCharacter { ch: 'x', pos: 4 }
        );
        assert_eq!(
            tokens("1=2").unwrap_err(),
            LexError::InvalidCharacter { ch: '=', pos: 1 }
        );
    }

    #[test]
    fn test_unicode_digits_are_rejected() {
        // Arabic-Indic digit one.
        assert!(matches!(
            tokens("\u{0661}").unwrap_err(),
            LexError::InvalidCharacter { pos: 0, .. }
        ));
    }

    #[test]
    fn test_stops_after_first_error() {
        let mut lexer = tokenize("a b");
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_huge_literal_lexes_to_infinity() {
        let literal = "9".repeat(400);
        assert_eq!(tokens(&literal).unwrap(), vec![Token::Number(f64::INFINITY)]);
    }
}
