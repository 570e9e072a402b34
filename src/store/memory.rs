//! In-process store with call recording and failure injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use canvas::doc::Presentation;
use serde_json::Value;

use super::{Store, StoreError, StoreSnapshot};

/// Status reported by injected failures.
pub const INJECTED_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<StoreSnapshot>,
    writes: Mutex<Vec<Vec<Value>>>,
    fetches: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_replace: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self { snapshot: Mutex::new(snapshot), ..Self::default() }
    }

    /// A store holding the encoded `presentations`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if a presentation cannot be serialized.
    pub fn with_presentations(presentations: &[Presentation]) -> Result<Self, StoreError> {
        StoreSnapshot::from_presentations(presentations).map(Self::new)
    }

    /// Make every subsequent fetch fail (or succeed again).
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent replace fail (or succeed again).
    pub fn set_fail_replace(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::SeqCst);
    }

    /// Current contents.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Every successful replace body, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<Value>> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn injected(op: &str) -> StoreError {
    StoreError::Status { status: INJECTED_FAILURE_STATUS, body: format!("injected {op} failure") }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn fetch(&self) -> Result<StoreSnapshot, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(injected("fetch"));
        }
        Ok(self.snapshot())
    }

    async fn replace_presentations(&self, presentations: &[Value]) -> Result<(), StoreError> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(injected("replace"));
        }
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner).presentations = presentations.to_vec();
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).push(presentations.to_vec());
        Ok(())
    }
}
