//! # Error handlers.
//!
//! - [`ErrorHandler`] - trait for sinks receiving handled errors
//! - [`HandlerFn`] - closure-backed handler
//! - [`HandlerRef`] - shared reference to a handler (`Arc<dyn ErrorHandler>`)
//! - [`HandledError`] - the wrapped error handed to sinks

mod handled;
mod handler;
mod handler_fn;

pub use handled::HandledError;
pub use handler::ErrorHandler;
pub use handler_fn::{HandlerFn, HandlerRef};
