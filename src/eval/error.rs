//! Evaluation error types.

use thiserror::Error;

/// Errors raised while evaluating a display expression.
///
/// The engine never shows these to the user: every variant collapses to the
/// same error marker on the display. The variants exist for logging and tests.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// The rewritten text is not a well-formed expression
    #[error("Malformed expression: {message}")]
    Malformed { message: String },

    /// A name other than `sqrt`, such as an error marker typed into
    #[error("Unknown name '{name}'")]
    UnknownName { name: String },

    /// The expression exceeds the evaluator's length or nesting limit
    #[error("Expression is too long or too deeply nested")]
    TooComplex,

    /// Division by zero or overflow
    #[error("Result is infinite")]
    Infinite,

    /// `0/0` and similar
    #[error("Result is not a number")]
    NotANumber,
}

impl From<fasteval::Error> for EvalError {
    fn from(err: fasteval::Error) -> Self {
        match err {
            fasteval::Error::Undefined(name) => Self::UnknownName { name },
            fasteval::Error::TooLong | fasteval::Error::TooDeep => Self::TooComplex,
            other => Self::Malformed {
                message: format!("{other:?}"),
            },
        }
    }
}
