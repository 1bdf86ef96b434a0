//! Evaluator over [`Expr`] trees with IEEE-754 `f64` semantics.

use super::ast::Expr;
use super::error::EvalError;
use super::token::Operator;

/// Compute the value of `expr`, left operand before right.
///
/// Every intermediate value must stay finite; infinity or NaN anywhere in
/// the tree is reported as [`EvalError::Overflow`].
///
/// Left-associative chains (`1+1+...+1`) grow the tree along its left spine,
/// so that spine is walked iteratively; recursion depth follows parentheses
/// and unary minus only, which the parser caps.
///
/// # Errors
/// Returns [`EvalError::DivisionByZero`] when a divisor evaluates to zero
/// (either sign) and [`EvalError::Overflow`] for non-finite values.
pub fn evaluate(expr: &Expr) -> Result<f64, EvalError> {
    let mut spine = Vec::new();
    let mut node = expr;
    let mut acc = loop {
        match node {
            Expr::Binary { op, lhs, rhs } => {
                spine.push((*op, rhs.as_ref()));
                node = lhs;
            }
            Expr::Number(value) => break finite(*value)?,
            Expr::Negate(operand) => break -evaluate(operand)?,
        }
    };

    for (op, rhs) in spine.into_iter().rev() {
        let rhs = evaluate(rhs)?;
        acc = apply(op, acc, rhs)?;
    }
    Ok(acc)
}

fn apply(op: Operator, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        Operator::Plus => lhs + rhs,
        Operator::Minus => lhs - rhs,
        Operator::Star => lhs * rhs,
        Operator::Slash => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs / rhs
        }
    };
    finite(value)
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Overflow)
    }
}
