//! Pending error resets.
//!
//! An evaluation error arms a reset that returns the display to `0` after a
//! delay. Time is passed in by the caller, so the timers here are plain
//! deadlines and firing them is deterministic.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What happens to a pending reset when more input arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolicy {
    /// Resets are never cancelled. A reset armed by an earlier error still
    /// fires after newer input and overwrites the display with `0`.
    #[default]
    Legacy,

    /// Any input event cancels every pending reset.
    Cancellable,
}

/// Deadlines of armed resets, oldest first.
#[derive(Clone, Debug, Default)]
pub struct PendingResets {
    deadlines: Vec<Instant>,
}

impl PendingResets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a reset. Earlier resets stay armed.
    pub fn arm(&mut self, deadline: Instant) {
        let index = self.deadlines.partition_point(|d| *d <= deadline);
        self.deadlines.insert(index, deadline);
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.deadlines.len();
        self.deadlines.clear();
        cancelled
    }

    /// Remove every reset due at `now`, returning how many fired.
    pub fn take_due(&mut self, now: Instant) -> usize {
        let due = self.deadlines.partition_point(|d| *d <= now);
        self.deadlines.drain(..due);
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.first().copied()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn take_due_fires_only_expired_deadlines() {
        let start = Instant::now();
        let mut resets = PendingResets::new();
        resets.arm(start + Duration::from_millis(1000));
        resets.arm(start + Duration::from_millis(1500));

        assert_eq!(resets.take_due(start + Duration::from_millis(999)), 0);
        assert_eq!(resets.take_due(start + Duration::from_millis(1000)), 1);
        assert_eq!(resets.len(), 1);
        assert_eq!(
            resets.next_deadline(),
            Some(start + Duration::from_millis(1500))
        );
        assert_eq!(resets.take_due(start + Duration::from_secs(5)), 1);
        assert!(resets.is_empty());
    }

    #[test]
    fn deadlines_stay_sorted() {
        let start = Instant::now();
        let mut resets = PendingResets::new();
        resets.arm(start + Duration::from_millis(300));
        resets.arm(start + Duration::from_millis(100));
        assert_eq!(
            resets.next_deadline(),
            Some(start + Duration::from_millis(100))
        );
    }

    #[test]
    fn cancel_all_clears_everything() {
        let start = Instant::now();
        let mut resets = PendingResets::new();
        resets.arm(start);
        resets.arm(start);
        assert_eq!(resets.cancel_all(), 2);
        assert!(resets.next_deadline().is_none());
    }

    #[test]
    fn policy_deserializes_lowercase() {
        let policy: ResetPolicy = serde_json::from_str("\"cancellable\"").unwrap();
        assert_eq!(policy, ResetPolicy::Cancellable);
        assert_eq!(ResetPolicy::default(), ResetPolicy::Legacy);
    }
}
