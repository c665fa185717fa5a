/*!
 * Queue Counters
 *
 * Size, waiter and removal counters. Writers hold the queue lock; readers
 * never do, so reads are relaxed and may be momentarily stale.
 */

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A counter on its own cache line
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
#[derive(Debug, Default)]
struct PaddedCounter {
    value: AtomicUsize,
}

impl PaddedCounter {
    #[inline(always)]
    fn load(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }

    #[inline(always)]
    fn add(&self, n: usize) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    #[inline(always)]
    fn sub(&self, n: usize) {
        self.value.fetch_sub(n, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    size: PaddedCounter,
    waiting: PaddedCounter,
    visited: PaddedCounter,
    closed: AtomicBool,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item appended to the store
    #[inline]
    pub fn record_insert(&self) {
        self.size.add(1);
    }

    /// `n` items removed from the store by callers
    #[inline]
    pub fn record_removals(&self, n: usize) {
        self.size.sub(n);
        self.visited.add(n);
    }

    /// Item handed straight to a waiter; it never touched the store
    #[inline]
    pub fn record_handoff(&self) {
        self.waiting.sub(1);
        self.visited.add(1);
    }

    /// `n` items dropped by close without reaching a caller
    #[inline]
    pub fn record_discards(&self, n: usize) {
        self.size.sub(n);
    }

    #[inline]
    pub fn waiter_joined(&self) {
        self.waiting.add(1);
    }

    #[inline]
    pub fn waiters_left(&self, n: usize) {
        self.waiting.sub(n);
    }

    #[inline]
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size.load()
    }

    #[inline]
    pub fn waiting(&self) -> usize {
        self.waiting.load()
    }

    #[inline]
    pub fn visited(&self) -> usize {
        self.visited.load()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_bookkeeping() {
        let counters = Counters::new();
        counters.record_insert();
        counters.record_insert();
        counters.record_insert();
        counters.record_removals(2);
        assert_eq!(counters.size(), 1);
        assert_eq!(counters.visited(), 2);

        counters.waiter_joined();
        counters.waiter_joined();
        counters.record_handoff();
        assert_eq!(counters.waiting(), 1);
        assert_eq!(counters.visited(), 3);
        assert_eq!(counters.size(), 1);

        counters.record_discards(1);
        counters.waiters_left(1);
        assert_eq!(counters.size(), 0);
        assert_eq!(counters.waiting(), 0);
        assert_eq!(counters.visited(), 3);
    }

    #[test]
    fn test_closed_flag() {
        let counters = Counters::new();
        assert!(!counters.is_closed());
        counters.mark_closed();
        assert!(counters.is_closed());
    }

    #[test]
    fn test_padded_alignment() {
        assert_eq!(std::mem::align_of::<PaddedCounter>(), 64);
    }
}
