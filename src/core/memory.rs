//! One-slot memory register.

use crate::eval::format_number;
use serde::{Deserialize, Serialize};

/// Numeric accumulator independent of the display.
///
/// Empty at session start and never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRegister {
    value: Option<f64>,
}

impl MemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// M+: an empty register is seeded with `amount`.
    pub fn add(&mut self, amount: f64) {
        self.value = Some(self.value.unwrap_or(0.0) + amount);
    }

    /// M-: an empty register is seeded with `-amount`.
    pub fn subtract(&mut self, amount: f64) {
        self.value = Some(match self.value {
            Some(current) => current - amount,
            None => -amount,
        });
    }

    /// Display text for MR, or `None` when empty.
    pub fn recall_text(&self) -> Option<String> {
        self.value.map(format_number)
    }
}
