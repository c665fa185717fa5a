/*!
 * Synchronization Primitives
 *
 * Per-waiter wake tickets used by the blocking queue:
 * - One private condvar per blocked consumer (no broadcast wakeups)
 * - Strict FIFO hand-off to the longest-waiting consumer
 */

mod waiters;

pub(crate) use waiters::{Ticket, WaiterList, Wakeup};
