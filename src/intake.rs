//! Intake queue between source tailers and the scheduler.
//!
//! Producers `push` from any thread; the scheduler takes everything buffered
//! with `drain_all` once per tick. The lock is held only for a single append
//! or a buffer swap, so neither side waits on the other's work.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Unbounded FIFO hand-off buffer. Cloning yields another handle to the same
/// queue.
#[derive(Debug, Clone, Default)]
pub struct IntakeQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl IntakeQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Never blocks on the consumer and never drops.
    pub fn push(&self, text: impl Into<String>) {
        self.lock().push_back(text.into());
    }

    /// Remove and return every buffered entry in arrival order.
    pub fn drain_all(&self) -> Vec<String> {
        let drained = std::mem::take(&mut *self.lock());
        drained.into()
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-written,
    // so a poisoned guard is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
