//! History persistence.
//!
//! The history log is stored as one JSON blob under a single fixed key in a
//! key/value store. It is read once when a session starts and overwritten in
//! full after every append; there is no partial update.

use crate::core::HistoryLog;
use tracing::info;

mod dir;
pub mod error;
mod memory;

pub use dir::DirStore;
pub use error::StorageError;
pub use memory::MemoryStore;

/// String key/value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read `key`, returning `None` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite `key` with `value`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage port for the history log.
pub trait HistoryStore: Send + Sync {
    /// Load the whole log. An absent blob is an empty log.
    fn load(&self) -> Result<HistoryLog, StorageError>;

    /// Replace the stored log with `log`.
    fn save(&self, log: &HistoryLog) -> Result<(), StorageError>;
}

/// [`HistoryStore`] keeping the log under one key of a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct KeyedHistoryStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyedHistoryStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> HistoryStore for KeyedHistoryStore<S> {
    fn load(&self) -> Result<HistoryLog, StorageError> {
        let Some(blob) = self.store.get(&self.key)? else {
            info!(key = %self.key, "No stored history");
            return Ok(HistoryLog::new());
        };
        let log = HistoryLog::from_json(&blob).map_err(|e| {
            StorageError::DeserializationFailed {
                key: self.key.clone(),
                message: e.to_string(),
            }
        })?;
        info!(key = %self.key, entries = log.len(), "Loaded history");
        Ok(log)
    }

    fn save(&self, log: &HistoryLog) -> Result<(), StorageError> {
        let blob = log
            .to_json()
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
        self.store.set(&self.key, &blob)
    }
}
