/*!
 * Item Store
 * Arrival-ordered item storage guarded by the queue lock
 */

use crate::core::errors::QueueError;
use std::collections::VecDeque;

/// FIFO item storage
///
/// All methods assume the caller holds the owning queue's lock.
#[derive(Debug)]
pub(crate) struct ItemStore<T> {
    items: VecDeque<T>,
}

impl<T> ItemStore<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Pre-reserve room for `capacity` items
    pub fn reserve(&mut self, capacity: usize) -> Result<(), QueueError> {
        self.items
            .try_reserve(capacity)
            .map_err(|_| QueueError::OutOfMemory {
                requested: capacity.saturating_mul(std::mem::size_of::<T>()),
            })
    }

    /// Insert at the tail
    ///
    /// Growth is fallible: on allocation failure the item is handed back.
    pub fn append(&mut self, item: T) -> Result<(), (QueueError, T)> {
        if let Err(err) = self.reserve(1) {
            return Err((err, item));
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Unlink and return the head item
    #[inline]
    pub fn remove_head(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Take every item out, leaving the store empty
    pub fn take_all(&mut self) -> VecDeque<T> {
        std::mem::take(&mut self.items)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_remove_order() {
        let mut store = ItemStore::new();
        for i in 0..5 {
            store.append(i).unwrap();
        }
        assert_eq!(store.len(), 5);

        let drained: Vec<_> = std::iter::from_fn(|| store.remove_head()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert_eq!(store.len(), 0);
        assert_eq!(store.remove_head(), None);
    }

    #[test]
    fn test_take_all_empties_store() {
        let mut store = ItemStore::new();
        store.append("a").unwrap();
        store.append("b").unwrap();

        let taken = store.take_all();
        assert_eq!(taken, ["a", "b"]);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_reserve_overflow_is_reported() {
        let mut store = ItemStore::<u64>::new();
        let err = store.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, QueueError::OutOfMemory { .. }));
        assert_eq!(store.len(), 0);
    }
}
