/*!
 * Fair Queue Library
 *
 * Unbounded, thread-safe FIFO queue with blocking and non-blocking removal.
 * Blocked consumers are served strictly in arrival order: each insertion is
 * handed to the longest-waiting consumer rather than waking everyone to race.
 *
 * - `enqueue` never blocks; `dequeue` blocks until an item arrives or the
 *   queue is closed; `try_dequeue` never blocks
 * - `size`, `waiting` and `visited` are lock-free relaxed reads
 * - `close` discards stored items and releases every blocked consumer
 */

pub mod core;
pub mod monitoring;
pub mod queue;

// Re-exports
pub use crate::core::errors::{EnqueueError, QueueError, QueueResult};
pub use monitoring::init_tracing;
pub use queue::{FairQueue, QueueConfig, QueueStats};
