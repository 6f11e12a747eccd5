//! Input events accepted by the calculator.
//!
//! Buttons and keys are translated into this closed set before they reach
//! the state machine, so the machine never sees an unknown payload.

use super::history::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single decimal digit `0`–`9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Digit(char);

impl Digit {
    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for Digit {
    type Error = InvalidSymbol;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii_digit() {
            Ok(Self(value))
        } else {
            Err(InvalidSymbol(value))
        }
    }
}

impl From<Digit> for char {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

/// A character that is not part of the expected symbol set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid symbol here")]
pub struct InvalidSymbol(pub char);

/// Binary operator keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
    ];

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Power => '^',
        }
    }

    /// Whether `ch` is the symbol of some operator.
    pub fn is_symbol(ch: char) -> bool {
        Self::try_from(ch).is_ok()
    }
}

impl TryFrom<char> for Operator {
    type Error = InvalidSymbol;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Self::Add),
            '-' => Ok(Self::Subtract),
            '*' => Ok(Self::Multiply),
            '/' => Ok(Self::Divide),
            '^' => Ok(Self::Power),
            other => Err(InvalidSymbol(other)),
        }
    }
}

/// The extra-operations row: `%`, `√` and `^`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtraOp {
    Percent,
    SquareRoot,
    Power,
}

impl ExtraOp {
    pub fn symbol(self) -> char {
        match self {
            Self::Percent => '%',
            Self::SquareRoot => '√',
            Self::Power => '^',
        }
    }
}

impl TryFrom<char> for ExtraOp {
    type Error = InvalidSymbol;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '%' => Ok(Self::Percent),
            '√' => Ok(Self::SquareRoot),
            '^' => Ok(Self::Power),
            other => Err(InvalidSymbol(other)),
        }
    }
}

/// Memory register commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryOp {
    /// MC
    Clear,
    /// MR
    Recall,
    /// M+
    Add,
    /// M-
    Subtract,
}

impl MemoryOp {
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "MC",
            Self::Recall => "MR",
            Self::Add => "M+",
            Self::Subtract => "M-",
        }
    }
}

/// Everything the state machine reacts to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Digit(Digit),
    Operator(Operator),
    ExtraOp(ExtraOp),
    Memory(MemoryOp),
    Clear,
    Equals,
    /// Continue from a past result
    HistoryReplay(HistoryEntry),
}

impl Event {
    /// Build a digit event, returning `None` for anything but `0`–`9`.
    pub fn digit(ch: char) -> Option<Self> {
        Digit::try_from(ch).ok().map(Self::Digit)
    }

    pub fn operator(ch: char) -> Option<Self> {
        Operator::try_from(ch).ok().map(Self::Operator)
    }

    pub fn extra_op(ch: char) -> Option<Self> {
        ExtraOp::try_from(ch).ok().map(Self::ExtraOp)
    }

    /// Get the event's name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Digit(_) => "Digit",
            Self::Operator(_) => "Operator",
            Self::ExtraOp(_) => "ExtraOp",
            Self::Memory(_) => "Memory",
            Self::Clear => "Clear",
            Self::Equals => "Equals",
            Self::HistoryReplay(_) => "HistoryReplay",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d.as_char()),
            Self::Operator(op) => write!(f, "{}", op.symbol()),
            Self::ExtraOp(op) => write!(f, "{}", op.symbol()),
            Self::Memory(op) => f.write_str(op.label()),
            Self::Clear => f.write_str("C"),
            Self::Equals => f.write_str("="),
            Self::HistoryReplay(entry) => write!(f, "replay {}", entry.result),
        }
    }
}
