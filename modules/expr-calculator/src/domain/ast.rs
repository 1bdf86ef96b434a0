use std::{fmt, mem};

use super::token::Operator;

/// Expression tree built by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Negate(Box<Expr>),
    Binary {
        op: Operator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    #[must_use]
    pub fn binary(op: Operator, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn negate(operand: Self) -> Self {
        Self::Negate(Box::new(operand))
    }

    /// Move the children out, leaving leaves behind.
    fn detach_children(&mut self, into: &mut Vec<Self>) {
        match self {
            Self::Number(_) => {}
            Self::Negate(operand) => {
                into.push(mem::replace(&mut **operand, Self::Number(0.0)));
            }
            Self::Binary { lhs, rhs, .. } => {
                into.push(mem::replace(&mut **lhs, Self::Number(0.0)));
                into.push(mem::replace(&mut **rhs, Self::Number(0.0)));
            }
        }
    }
}

/// Renders the tree fully parenthesized, so the output re-parses to an
/// equivalent tree regardless of precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Negate(operand) => write!(f, "(-{operand})"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

/// Frees the tree with an explicit stack; left-associative chains make the
/// tree as deep as the input is long.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending: Vec<Self> = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}
