/*!
 * Error Types
 * Queue error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Queue errors with serialization support
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Queue is closed")]
    #[diagnostic(
        code(queue::closed),
        help("The queue was shut down. Drain it before closing if pending items matter.")
    )]
    Closed,

    #[error("Out of memory: could not reserve {requested} bytes for a queue node")]
    #[diagnostic(
        code(queue::out_of_memory),
        help("The item store could not grow. Free memory or consume pending items.")
    )]
    OutOfMemory { requested: usize },
}

impl QueueError {
    /// Whether this error means the queue will never accept or yield items again
    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed)
    }
}

/// Rejected enqueue: the failure plus the item, handed back to the caller
///
/// Ownership of the item never passes to the queue when enqueue fails.
pub struct EnqueueError<T> {
    kind: QueueError,
    item: T,
}

impl<T> EnqueueError<T> {
    pub(crate) fn new(kind: QueueError, item: T) -> Self {
        Self { kind, item }
    }

    /// The reason the item was rejected
    #[inline]
    pub fn kind(&self) -> QueueError {
        self.kind
    }

    /// Borrow the rejected item
    #[inline]
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Take back the rejected item
    #[inline]
    pub fn into_inner(self) -> T {
        self.item
    }
}

// Manual impls so `T` needs no `Debug` bound
impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnqueueError")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enqueue rejected: {}", self.kind)
    }
}

impl<T> std::error::Error for EnqueueError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<T> From<EnqueueError<T>> for QueueError {
    fn from(err: EnqueueError<T>) -> Self {
        err.kind
    }
}
