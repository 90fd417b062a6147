//! # Queue configuration.
//!
//! Provides [`Config`] construction-time settings for an [`AsyncError`](crate::AsyncError).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → clamped to 1 (a zero-sized bounded channel cannot exist)

/// Default number of errors the queue buffers before `add` suspends.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Construction-time configuration.
///
/// ## Field semantics
/// - `queue_capacity`: bounded queue size, fixed for the instance's lifetime (min 1)
///
/// Collaborators (logger, handler, base error) are trait objects and are set
/// on the [`AsyncErrorBuilder`](crate::AsyncErrorBuilder) instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Capacity of the bounded error queue.
    ///
    /// Once the queue holds `queue_capacity` errors, [`add`](crate::AsyncError::add)
    /// suspends the caller and [`add_async`](crate::AsyncError::add_async) parks
    /// the error on a spawned task until the dispatch loop frees a slot.
    pub queue_capacity: usize,
}

impl Config {
    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `queue_capacity = 10`
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
