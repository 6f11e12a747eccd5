//! Evaluation history tracking.
//!
//! Provides an append-only log of completed evaluations, following
//! functional programming principles: recording consumes the log and
//! returns the extended one.

use serde::{Deserialize, Serialize};

/// Record of a single successful evaluation.
///
/// # Example
///
/// ```rust
/// use tally::core::HistoryEntry;
///
/// let entry = HistoryEntry::new("2+2", "4");
/// assert_eq!(entry.expression, "2+2");
/// assert_eq!(entry.result, "4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Display text before evaluation
    pub expression: String,
    /// Formatted result shown after evaluation
    pub result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }
}

/// Ordered log of past evaluations.
///
/// Serializes as a bare JSON array of `{ "expression", "result" }` objects.
/// There is no eviction: the log grows for as long as it is persisted.
///
/// # Example
///
/// ```rust
/// use tally::core::{HistoryEntry, HistoryLog};
///
/// let log = HistoryLog::new();
/// let log = log.record(HistoryEntry::new("1+1", "2"));
/// let log = log.record(HistoryEntry::new("2*3", "6"));
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.last().unwrap().result, "6");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl From<Vec<HistoryEntry>> for HistoryLog {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }
}

impl HistoryLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, returning the extended log.
    ///
    /// The log is taken by value, so appending never copies earlier entries.
    /// Callers that need the previous log keep a clone.
    ///
    /// ```rust
    /// use tally::core::{HistoryEntry, HistoryLog};
    ///
    /// let log = HistoryLog::new();
    /// let before = log.clone();
    /// let log = log.record(HistoryEntry::new("9", "9"));
    /// assert_eq!(log.len(), 1);
    /// assert!(before.is_empty());
    /// ```
    pub fn record(mut self, entry: HistoryEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Serialize the whole log as a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a log from a JSON array.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
