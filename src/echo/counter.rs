//! Mismatch counter shared by all workers of a run

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Atomic count of (worker, iteration) pairs whose echo did not match.
///
/// Cloning hands out another handle to the same counter. Only the total
/// matters, so increments use relaxed ordering; the coordinator reads the
/// value after every worker has been joined.
#[derive(Debug, Clone, Default)]
pub struct FailureCounter {
    inner: Arc<AtomicU64>,
}

impl FailureCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one mismatch, returning the new total
    pub fn increment(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let counter = FailureCounter::new();
        let handle = counter.clone();

        assert_eq!(handle.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
        assert_eq!(handle.get(), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counter = FailureCounter::new();

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        counter.increment();
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(counter.get(), 80_000);
    }
}
