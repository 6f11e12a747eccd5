//! Tally: a keystroke-driven calculator engine
//!
//! Tally follows the "pure core, imperative shell" philosophy. The core state
//! machine turns input events into a display string, a memory register and an
//! append-only history with no side effects, while persistence and timers
//! live in an async shell built on Stillwater effects and tokio.
//!
//! # Core Concepts
//!
//! - **Display**: the single visible expression string, `0` by default
//! - **Events**: a closed set of digits, operators, extra operations, memory commands
//! - **Evaluation**: `%` and `√` rewrites evaluated with fasteval
//! - **History**: immutable `{expression, result}` log persisted as a whole
//!
//! # Example
//!
//! ```rust
//! use tally::core::{Calculator, Event, MemoryOp};
//! use std::time::Instant;
//!
//! let mut calc = Calculator::default();
//! let now = Instant::now();
//!
//! calc.apply(Event::digit('7').unwrap(), now);
//! calc.apply(Event::Memory(MemoryOp::Add), now);
//! calc.apply(Event::digit('3').unwrap(), now);
//! calc.apply(Event::Memory(MemoryOp::Add), now);
//! calc.apply(Event::Memory(MemoryOp::Recall), now);
//!
//! assert_eq!(calc.text(), "10");
//! ```

pub mod config;
pub mod core;
pub mod effects;
pub mod eval;
pub mod keys;
pub mod storage;

// Re-export commonly used types
pub use config::CalculatorConfig;
pub use core::{Calculator, Event, HistoryEntry, HistoryLog, StepResult};
pub use effects::{Session, SessionEnv};
