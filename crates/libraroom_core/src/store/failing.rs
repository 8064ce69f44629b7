//! Store double whose reads and writes can be switched to fail.

use super::{KeyValueStore, MemoryKeyValueStore, StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory store with togglable failures; clones share entries and toggles.
#[derive(Clone, Default)]
pub(crate) struct FailingKeyValueStore {
    inner: MemoryKeyValueStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingKeyValueStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Covers both `set` and `remove`.
    pub(crate) fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Direct access that bypasses the toggles.
    pub(crate) fn entries(&self) -> &MemoryKeyValueStore {
        &self.inner
    }

    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Poisoned);
        }
        Ok(())
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.remove(key)
    }
}
