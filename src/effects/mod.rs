//! Effectful calculator operations using Stillwater 0.11.0.
//!
//! This module provides the "imperative shell" around the pure core:
//! history persistence and the async session that owns timers and the
//! display channel.
//!
//! # Key Concepts
//!
//! - **Environment**: [`HistoryEnv`] gives effects access to the storage port
//! - **Effects**: [`load_history`] and [`save_history`] are run against an environment
//! - **Session**: [`Session`] drives a [`Calculator`](crate::core::Calculator)
//!   from a channel of commands and fires error resets on tokio timers

mod persist;
mod session;

pub use persist::{load_history, save_history, HistoryEnv, SessionEnv};
pub use session::{Command, Session};
