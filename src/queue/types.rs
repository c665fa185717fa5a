/*!
 * Queue Types
 * Configuration and statistics for blocking queues
 */

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Label used when none is configured
pub const DEFAULT_QUEUE_LABEL: &str = "queue";

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Items to pre-reserve in the store
    pub initial_capacity: usize,
    /// Name attached to every trace event of the queue
    pub label: Cow<'static, str>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            label: Cow::Borrowed(DEFAULT_QUEUE_LABEL),
        }
    }
}

impl QueueConfig {
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }
}

/// Point-in-time queue statistics
///
/// Counters are read without the queue lock, so a snapshot taken while other
/// threads are active may mix slightly different moments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub label: String,
    /// Items currently stored
    pub size: usize,
    /// Consumers currently blocked in dequeue
    pub waiting: usize,
    /// Items removed since creation
    pub visited: usize,
    pub closed: bool,
}
