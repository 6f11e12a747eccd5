//! History persistence as effects over an environment.

use crate::core::HistoryLog;
use crate::storage::{HistoryStore, KeyValueStore, KeyedHistoryStore, MemoryStore, StorageError};
use std::sync::Arc;
use stillwater::effect::Effect;
use stillwater::prelude::*;

/// Environment capability: access to the history storage port.
pub trait HistoryEnv: Clone + Send + Sync + 'static {
    type Store: HistoryStore;

    fn history_store(&self) -> &Self::Store;
}

/// Production environment wrapping a shared [`HistoryStore`].
pub struct SessionEnv<H> {
    history: Arc<H>,
}

impl<H> Clone for SessionEnv<H> {
    fn clone(&self) -> Self {
        Self {
            history: Arc::clone(&self.history),
        }
    }
}

impl<H: HistoryStore + 'static> SessionEnv<H> {
    pub fn new(history: H) -> Self {
        Self {
            history: Arc::new(history),
        }
    }
}

impl<S: KeyValueStore + 'static> SessionEnv<KeyedHistoryStore<S>> {
    /// Keep the history under `key` of `store`.
    pub fn keyed(store: S, key: impl Into<String>) -> Self {
        Self::new(KeyedHistoryStore::new(store, key))
    }
}

impl SessionEnv<KeyedHistoryStore<MemoryStore>> {
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::keyed(MemoryStore::new(), key)
    }
}

impl<H: HistoryStore + 'static> HistoryEnv for SessionEnv<H> {
    type Store = H;

    fn history_store(&self) -> &H {
        &self.history
    }
}

/// Read the whole history log from the environment's store.
pub fn load_history<Env: HistoryEnv>(
) -> impl Effect<Output = HistoryLog, Error = StorageError, Env = Env> {
    from_fn(|env: &Env| env.history_store().load())
}

/// Overwrite the stored history log with `log`.
pub fn save_history<Env: HistoryEnv>(
    log: HistoryLog,
) -> impl Effect<Output = (), Error = StorageError, Env = Env> {
    from_fn(move |env: &Env| env.history_store().save(&log))
}
