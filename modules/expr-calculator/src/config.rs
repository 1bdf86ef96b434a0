use serde::{Deserialize, Serialize};

/// Configuration for the expression calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Longest accepted expression, in characters.
    #[serde(default = "default_max_expression_len")]
    pub max_expression_len: usize,
    /// Deepest accepted nesting of parentheses and unary minus.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_expression_len: default_max_expression_len(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_expression_len() -> usize {
    1000
}

fn default_max_depth() -> usize {
    100
}

/// Upper bound accepted for `max_expression_len`.
pub const MAX_EXPRESSION_LEN_LIMIT: usize = 10_000;

/// Upper bound accepted for `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 500;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("calculator.{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("calculator.{field} must be at most {max}, got {value}")]
    LimitTooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

impl CalculatorConfig {
    /// Both limits bound the parser and evaluator stack, so they must be
    /// non-zero and no larger than [`MAX_EXPRESSION_LEN_LIMIT`] and
    /// [`MAX_DEPTH_LIMIT`].
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroLimit`] if any limit is zero and
    /// [`ConfigError::LimitTooLarge`] if one exceeds its upper bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_limit(
            "max_expression_len",
            self.max_expression_len,
            MAX_EXPRESSION_LEN_LIMIT,
        )?;
        check_limit("max_depth", self.max_depth, MAX_DEPTH_LIMIT)
    }
}

fn check_limit(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroLimit { field });
    }
    if value > max {
        return Err(ConfigError::LimitTooLarge { field, value, max });
    }
    Ok(())
}
