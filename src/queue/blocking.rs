/*!
 * Fair Blocking Queue
 *
 * Unbounded FIFO queue with blocking and non-blocking removal.
 *
 * # Design
 *
 * One mutex guards the item store, the waiter list and the closed flag.
 * Consumers that find the store empty take a ticket at the tail of the
 * waiter list and sleep on that ticket's private condvar. A producer that
 * finds a parked consumer hands the item straight into the oldest ticket
 * instead of storing it, so the N-th blocked consumer always receives the
 * N-th subsequent item. While any consumer is parked the store is empty.
 *
 * Closing sets the closed flag, discards stored items and releases every
 * parked consumer with [`QueueError::Closed`].
 */

use super::counters::Counters;
use super::store::ItemStore;
use super::types::{QueueConfig, QueueStats};
use crate::core::errors::{EnqueueError, QueueError, QueueResult};
use crate::core::sync::{Ticket, WaiterList, Wakeup};
use crate::monitoring::WaitSpan;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// State guarded by the queue lock
struct State<T> {
    store: ItemStore<T>,
    waiters: WaiterList<T>,
    closed: bool,
}

/// Unbounded FIFO queue with first-come-first-served blocking consumers
///
/// # Examples
///
/// ```
/// use fair_queue::FairQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(FairQueue::new());
/// let consumer = {
///     let queue = queue.clone();
///     thread::spawn(move || queue.dequeue())
/// };
///
/// queue.enqueue(42).unwrap();
/// assert_eq!(consumer.join().unwrap(), Ok(42));
/// assert_eq!(queue.visited(), 1);
/// ```
pub struct FairQueue<T> {
    state: Mutex<State<T>>,
    counters: Counters,
    label: Cow<'static, str>,
}

impl<T> FairQueue<T> {
    /// Create an empty queue with default configuration
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create an empty queue
    pub fn with_config(config: QueueConfig) -> Self {
        let mut store = ItemStore::new();
        if config.initial_capacity > 0 {
            if let Err(e) = store.reserve(config.initial_capacity) {
                warn!(label = %config.label, error = %e, "Initial reservation failed, growing on demand");
            }
        }

        info!(
            label = %config.label,
            initial_capacity = config.initial_capacity,
            "Queue created"
        );

        Self {
            state: Mutex::new(State {
                store,
                waiters: WaiterList::new(),
                closed: false,
            }),
            counters: Counters::new(),
            label: config.label,
        }
    }

    /// Append an item, or hand it to the longest-waiting consumer
    ///
    /// Wakes at most one consumer. On failure the item is returned inside
    /// the error.
    pub fn enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(EnqueueError::new(QueueError::Closed, item));
        }

        debug_assert!(state.waiters.is_empty() || state.store.len() == 0);
        if let Some(ticket) = state.waiters.pop_oldest() {
            state.waiters.deliver(ticket, Wakeup::Delivered(item));
            self.counters.record_handoff();
            debug!(label = %self.label, ticket = ticket.index(), "Handed item to oldest waiter");
            return Ok(());
        }

        state
            .store
            .append(item)
            .map_err(|(err, item)| EnqueueError::new(err, item))?;
        self.counters.record_insert();
        trace!(label = %self.label, size = state.store.len(), "Item enqueued");
        Ok(())
    }

    /// Remove the head item, blocking while the queue is empty
    ///
    /// Blocked callers are served strictly in the order they started waiting.
    /// Returns [`QueueError::Closed`] if the queue is (or becomes) closed.
    pub fn dequeue(&self) -> QueueResult<T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed);
        }

        // Fast path: no registration
        if let Some(item) = self.remove_head(&mut state) {
            return Ok(item);
        }

        let mut registration = Registration::park(state, &self.counters, &self.label);
        debug_assert_eq!(registration.state.waiters.len(), self.counters.waiting());
        debug!(
            label = %self.label,
            ticket = registration.ticket.index(),
            waiting = self.counters.waiting(),
            "Queue empty, consumer parked"
        );
        registration.wait()
    }

    /// Remove the head item without blocking
    ///
    /// Returns `Ok(None)` on an empty queue without registering as a waiter.
    pub fn try_dequeue(&self) -> QueueResult<Option<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed);
        }
        Ok(self.remove_head(&mut state))
    }

    /// Remove every stored item in FIFO order
    ///
    /// Use before [`FairQueue::close`] to keep items that close would discard.
    pub fn drain(&self) -> Vec<T> {
        let drained = {
            let mut state = self.state.lock();
            let drained = state.store.take_all();
            self.counters.record_removals(drained.len());
            drained
        };
        trace!(label = %self.label, drained = drained.len(), "Queue drained");
        drained.into()
    }

    /// Close the queue
    ///
    /// Discards stored items, releases every blocked consumer with
    /// [`QueueError::Closed`] and rejects all later item operations.
    /// Returns the number of discarded items; closing twice returns 0.
    pub fn close(&self) -> usize {
        let (discarded, released) = {
            let mut state = self.state.lock();
            if state.closed {
                return 0;
            }
            state.closed = true;
            self.counters.mark_closed();

            let discarded = state.store.take_all();
            self.counters.record_discards(discarded.len());

            let released = state.waiters.release_all();
            self.counters.waiters_left(released.len());
            for ticket in &released {
                debug!(label = %self.label, ticket = ticket.index(), "Released parked consumer");
            }
            (discarded, released.len())
        };

        // Item destructors run outside the lock
        let count = discarded.len();
        drop(discarded);

        if count > 0 {
            warn!(label = %self.label, discarded = count, "Queue closed with undrained items");
        }
        info!(label = %self.label, discarded = count, released, "Queue closed");
        count
    }

    /// Items currently stored (relaxed read)
    #[inline]
    pub fn size(&self) -> usize {
        self.counters.size()
    }

    /// Consumers currently blocked in [`FairQueue::dequeue`] (relaxed read)
    #[inline]
    pub fn waiting(&self) -> usize {
        self.counters.waiting()
    }

    /// Items removed since creation (relaxed read, never decreases)
    #[inline]
    pub fn visited(&self) -> usize {
        self.counters.visited()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.counters.is_closed()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            label: self.label.to_string(),
            size: self.size(),
            waiting: self.waiting(),
            visited: self.visited(),
            closed: self.is_closed(),
        }
    }

    fn remove_head(&self, state: &mut State<T>) -> Option<T> {
        let item = state.store.remove_head()?;
        self.counters.record_removals(1);
        trace!(label = %self.label, size = state.store.len(), "Item dequeued");
        Some(item)
    }
}

impl<T> Default for FairQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for FairQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FairQueue")
            .field("label", &self.label)
            .field("size", &self.size())
            .field("waiting", &self.waiting())
            .field("visited", &self.visited())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A parked consumer's ticket, held together with the queue lock
///
/// Dropping the registration returns the ticket's slot to the arena and
/// then unlocks, on every exit path.
struct Registration<'a, T> {
    state: MutexGuard<'a, State<T>>,
    counters: &'a Counters,
    ticket: Ticket,
    signal: Arc<Condvar>,
    span: Option<WaitSpan>,
}

impl<'a, T> Registration<'a, T> {
    fn park(mut state: MutexGuard<'a, State<T>>, counters: &'a Counters, label: &str) -> Self {
        let (ticket, signal) = state.waiters.register();
        counters.waiter_joined();
        Self {
            state,
            counters,
            ticket,
            signal,
            span: Some(WaitSpan::new(label, ticket.index())),
        }
    }

    /// Sleep until a wakeup lands in this ticket
    fn wait(&mut self) -> QueueResult<T> {
        let (result, outcome) = loop {
            match self.state.waiters.take(self.ticket) {
                Some(Wakeup::Delivered(item)) => break (Ok(item), "delivered"),
                Some(Wakeup::Released) => break (Err(QueueError::Closed), "closed"),
                // Not woken yet, or spurious wakeup
                None => self.signal.wait(&mut self.state),
            }
        };

        if let Some(span) = self.span.take() {
            span.finish(outcome);
        }
        result
    }
}

impl<T> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        if self.state.waiters.unregister(self.ticket) {
            self.counters.waiters_left(1);
        }
    }
}
