//! # Logger collaborator.
//!
//! The queue reports lifecycle notices and, when no [`ErrorHandler`](crate::ErrorHandler)
//! is configured, every handled error through a [`Logger`].
//!
//! - [`Logger`] - two-method reporting trait
//! - [`TracingLogger`] - default implementation emitting `tracing` events
//! - [`LoggerRef`] - shared reference to a logger (`Arc<dyn Logger>`)

mod tracing_logger;

use std::error::Error;
use std::sync::Arc;

pub use tracing_logger::TracingLogger;

/// Shared handle to a logger.
pub type LoggerRef = Arc<dyn Logger>;

/// Informational and fallback reporting.
///
/// Failures inside a logger are not handled by the queue.
pub trait Logger: Send + Sync + 'static {
    /// Lifecycle notice (loop started/stopped, instance closed).
    fn info(&self, msg: &str);

    /// Error report; `err` is usually a [`HandledError`](crate::HandledError).
    fn error(&self, err: &(dyn Error + 'static), msg: &str);
}
