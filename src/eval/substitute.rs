//! Textual rewrites applied to the display text before parsing.
//!
//! The display uses two symbols the evaluator does not know: postfix `%` and
//! prefix `√`. Both are rewritten into plain arithmetic. A root written right
//! after a number or another root multiplies it, so `5√9` reads `5*sqrt(9)`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A number (optionally with one fractional part) directly followed by `%`.
    static ref PERCENT: Regex = Regex::new(r"(\d+(?:\.\d+)?)%").unwrap();

    /// A `√` directly followed by a number.
    static ref SQUARE_ROOT: Regex = Regex::new(r"√(\d+(?:\.\d+)?)").unwrap();

    /// A rewritten root directly preceded by a digit or a closing parenthesis.
    static ref ADJACENT_ROOT: Regex = Regex::new(r"([\d)])sqrt\(").unwrap();
}

/// Rewrite every `N%` as `(N/100)`.
pub fn expand_percent(input: &str) -> String {
    PERCENT.replace_all(input, "(${1}/100)").into_owned()
}

/// Rewrite every `√N` as `sqrt(N)`, multiplying it with a value right before it.
///
/// A `√` that is not directly followed by digits is left untouched and
/// evaluation rejects it.
pub fn expand_square_root(input: &str) -> String {
    let rooted = SQUARE_ROOT.replace_all(input, "sqrt(${1})");
    ADJACENT_ROOT
        .replace_all(&rooted, "${1}*sqrt(")
        .into_owned()
}

/// Apply both rewrites in order: percent first, then square root.
pub fn expand(input: &str) -> String {
    expand_square_root(&expand_percent(input))
}
