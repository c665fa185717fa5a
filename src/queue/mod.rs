/*!
 * Queue Module
 * Unbounded blocking FIFO queue with fair consumer hand-off
 */

mod blocking;
mod counters;
mod store;
pub mod types;

// Re-export public API
pub use blocking::FairQueue;
pub use types::{QueueConfig, QueueStats, DEFAULT_QUEUE_LABEL};
