//! # Error handler trait.
//!
//! Provides [`ErrorHandler`] the external sink that receives every handled error.
//!
//! ## Rules
//! - The dispatch loop spawns one invocation per error and never awaits it.
//! - Invocations may complete out of order relative to dequeue order.
//! - A panic inside an invocation is caught and reported through the
//!   configured [`Logger`](crate::Logger); it never reaches the dispatch loop.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use aerrors::{ErrorHandler, HandledError};
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl ErrorHandler for Alerts {
//!     async fn handle_error(&self, err: HandledError) {
//!         eprintln!("alert: {err}");
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

use async_trait::async_trait;

use crate::handlers::HandledError;

/// Sink for errors drained from the queue.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Long-running work delays [`AsyncError::close`](crate::AsyncError::close),
///   which waits for every admitted error to be handled.
#[async_trait]
pub trait ErrorHandler: Send + Sync + 'static {
    /// Handles a single error.
    ///
    /// Called from a freshly spawned task, not from the dispatch loop.
    async fn handle_error(&self, err: HandledError);

    /// Returns the handler name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
