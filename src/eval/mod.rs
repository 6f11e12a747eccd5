//! Expression evaluation for the calculator display.
//!
//! Evaluation is a small pipeline:
//!
//! 1. [`substitute::expand`] rewrites `N%` to `(N/100)` and `√N` to `sqrt(N)`
//! 2. fasteval computes the value with conventional precedence
//! 3. [`format_number`] renders the value for the display
//!
//! fasteval rejects input over 4096 bytes or nested more than 32 levels, so
//! a runaway display fails evaluation instead of exhausting the stack.
//!
//! # Example
//!
//! ```rust
//! use tally::eval::evaluate;
//!
//! assert_eq!(evaluate("50%").unwrap(), 0.5);
//! assert_eq!(evaluate("√9+1").unwrap(), 4.0);
//! assert!(evaluate("5/0").is_err());
//! ```

mod error;
mod format;
mod substitute;

pub use error::EvalError;
pub use format::format_number;
pub use substitute::{expand, expand_percent, expand_square_root};

/// Functions available to expressions beyond fasteval's built-ins.
fn functions(name: &str, args: Vec<f64>) -> Option<f64> {
    match (name, args.as_slice()) {
        ("sqrt", [x]) => Some(x.sqrt()),
        _ => None,
    }
}

/// Evaluate raw display text to a finite number.
pub fn evaluate(text: &str) -> Result<f64, EvalError> {
    let expanded = expand(text);
    let mut namespace = functions;
    let value = fasteval::ez_eval(&expanded, &mut namespace)?;
    if value.is_nan() {
        Err(EvalError::NotANumber)
    } else if value.is_infinite() {
        Err(EvalError::Infinite)
    } else {
        Ok(value)
    }
}

/// Evaluate raw display text and format the result for display.
pub fn evaluate_to_string(text: &str) -> Result<String, EvalError> {
    evaluate(text).map(format_number)
}
