/*!
 * Core Module
 * Error handling and synchronization building blocks
 */

pub mod errors;
pub(crate) mod sync;

// Re-export for convenience
pub use errors::*;
