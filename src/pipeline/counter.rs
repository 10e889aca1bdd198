use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared tally of successfully indexed files. Clones share the same count; give every worker a
/// clone and read it after the pipeline finishes.
#[derive(Clone, Debug, Default)]
pub struct IndexCounter {
    count: Arc<AtomicUsize>,
}

impl IndexCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically add one and return the new value.
    pub fn increment_and_get(&self) -> usize {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}
