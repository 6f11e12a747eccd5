//! Core calculator types and logic.
//!
//! This module contains the pure core of the calculator:
//! - Display state and its mode
//! - The closed set of input events
//! - Memory register and append-only history
//! - The state machine applying events, with explicit time for error resets
//!
//! Nothing in this module performs I/O, following the
//! "pure core, imperative shell" philosophy.

mod event;
mod history;
mod machine;
mod memory;
mod reset;
mod state;

pub use event::{Digit, Event, ExtraOp, InvalidSymbol, MemoryOp, Operator};
pub use history::{HistoryEntry, HistoryLog};
pub use machine::{Calculator, StepResult};
pub use memory::MemoryRegister;
pub use reset::{PendingResets, ResetPolicy};
pub use state::{DisplayState, Mode};
