/*!
 * Waiter List
 *
 * FIFO list of blocked consumers, backed by an index-based ticket arena.
 *
 * # Design
 *
 * Each blocked consumer owns one ticket: an arena slot holding a private
 * condvar and a hand-off cell. Producers never broadcast. They pop the oldest
 * ticket, write the wakeup into its cell and signal only that ticket's condvar.
 * Because the item is written into the ticket itself, the assignment follows
 * registration order even if woken threads reacquire the lock out of order.
 *
 * - Slots are recycled through a free list (condvars are reused, not reallocated)
 * - Every method must be called with the owning queue's lock held
 * - All condvars are only ever waited on with that same lock
 */

use parking_lot::Condvar;
use std::collections::VecDeque;
use std::sync::Arc;

/// Handle to a registered waiter's arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Ticket(usize);

impl Ticket {
    /// Arena slot index (for diagnostics)
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a parked consumer finds in its ticket when it is woken
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Wakeup<T> {
    /// An item was handed directly to this waiter
    Delivered(T),
    /// The queue was closed while this waiter was parked
    Released,
}

#[derive(Debug)]
enum SlotState<T> {
    Vacant,
    Parked,
    Woken(Wakeup<T>),
    Claimed,
}

#[derive(Debug)]
struct Slot<T> {
    signal: Arc<Condvar>,
    state: SlotState<T>,
}

/// Strict FIFO list of parked consumers
#[derive(Debug)]
pub(crate) struct WaiterList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    order: VecDeque<usize>,
}

impl<T> WaiterList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: VecDeque::new(),
        }
    }

    /// Number of parked waiters
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register a new waiter at the tail
    ///
    /// Returns the ticket plus the waiter's private signal. The caller waits on
    /// that signal (with the queue lock) until [`WaiterList::take`] yields a wakeup.
    pub fn register(&mut self) -> (Ticket, Arc<Condvar>) {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].state = SlotState::Parked;
                index
            }
            None => {
                self.slots.push(Slot {
                    signal: Arc::new(Condvar::new()),
                    state: SlotState::Parked,
                });
                self.slots.len() - 1
            }
        };

        self.order.push_back(index);
        (Ticket(index), self.slots[index].signal.clone())
    }

    /// Pop the longest-waiting ticket
    pub fn pop_oldest(&mut self) -> Option<Ticket> {
        self.order.pop_front().map(Ticket)
    }

    /// Hand a wakeup to a popped ticket and signal its owner
    ///
    /// The ticket must come from [`WaiterList::pop_oldest`].
    pub fn deliver(&mut self, ticket: Ticket, wakeup: Wakeup<T>) {
        let slot = &mut self.slots[ticket.0];
        debug_assert!(matches!(slot.state, SlotState::Parked));
        slot.state = SlotState::Woken(wakeup);
        slot.signal.notify_one();
    }

    /// Release every parked waiter with [`Wakeup::Released`]
    ///
    /// Returns the released tickets, oldest first.
    pub fn release_all(&mut self) -> Vec<Ticket> {
        let released: Vec<Ticket> = self.order.drain(..).map(Ticket).collect();
        for &ticket in &released {
            self.deliver(ticket, Wakeup::Released);
        }
        released
    }

    /// Claim the wakeup delivered to `ticket`, if any
    ///
    /// `None` means the ticket is still parked (spurious wakeup).
    pub fn take(&mut self, ticket: Ticket) -> Option<Wakeup<T>> {
        let slot = &mut self.slots[ticket.0];
        match std::mem::replace(&mut slot.state, SlotState::Claimed) {
            SlotState::Woken(wakeup) => Some(wakeup),
            other => {
                slot.state = other;
                None
            }
        }
    }

    /// Return a ticket's slot to the arena
    ///
    /// Returns `true` if the ticket was still parked, i.e. it left the list
    /// without being woken. An unclaimed delivered item is dropped here.
    pub fn unregister(&mut self, ticket: Ticket) -> bool {
        let previous = std::mem::replace(&mut self.slots[ticket.0].state, SlotState::Vacant);
        self.free.push(ticket.0);

        let was_parked = matches!(previous, SlotState::Parked);
        if was_parked {
            self.order.retain(|&index| index != ticket.0);
        }
        was_parked
    }
}

#[cfg(test)]
impl<T> WaiterList<T> {
    /// Private signal of the slot at `index`
    pub fn signal_at(&self, index: usize) -> Arc<Condvar> {
        self.slots[index].signal.clone()
    }
}

impl<T> Default for WaiterList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_oldest_is_fifo() {
        let mut list = WaiterList::<u32>::new();
        let (a, _) = list.register();
        let (b, _) = list.register();
        let (c, _) = list.register();
        assert_eq!(list.len(), 3);

        assert_eq!(list.pop_oldest(), Some(a));
        assert_eq!(list.pop_oldest(), Some(b));
        assert_eq!(list.pop_oldest(), Some(c));
        assert_eq!(list.pop_oldest(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_deliver_then_take() {
        let mut list = WaiterList::new();
        let (ticket, _) = list.register();

        // Nothing delivered yet
        assert_eq!(list.take(ticket), None);

        let popped = list.pop_oldest().unwrap();
        list.deliver(popped, Wakeup::Delivered("item"));
        assert_eq!(list.take(ticket), Some(Wakeup::Delivered("item")));
        assert_eq!(list.take(ticket), None);

        assert!(!list.unregister(ticket));
    }

    #[test]
    fn test_release_all() {
        let mut list = WaiterList::<u8>::new();
        let tickets: Vec<_> = (0..4).map(|_| list.register().0).collect();

        assert_eq!(list.release_all(), tickets);
        assert!(list.is_empty());
        for ticket in tickets {
            assert_eq!(list.take(ticket), Some(Wakeup::Released));
        }
    }

    #[test]
    fn test_unregister_parked_removes_from_order() {
        let mut list = WaiterList::<u8>::new();
        let (a, _) = list.register();
        let (b, _) = list.register();

        assert!(list.unregister(a));
        assert_eq!(list.len(), 1);
        assert_eq!(list.pop_oldest(), Some(b));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut list = WaiterList::<u8>::new();
        let (first, signal) = list.register();
        list.unregister(first);

        let (second, reused) = list.register();
        assert_eq!(first.index(), second.index());
        assert!(Arc::ptr_eq(&signal, &reused));
    }
}
