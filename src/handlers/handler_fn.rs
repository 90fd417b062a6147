//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(HandledError) -> Fut`, producing a fresh
//! future per handled error. Shared state goes behind an explicit `Arc<...>`
//! captured by the closure.
//!
//! ## Example
//! ```rust
//! use aerrors::{HandlerFn, HandlerRef, HandledError};
//!
//! let h: HandlerRef = HandlerFn::arc("stderr", |err: HandledError| async move {
//!     eprintln!("{err}");
//! });
//!
//! assert_eq!(h.name(), "stderr");
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::handlers::{ErrorHandler, HandledError};

/// Shared handle to a handler (`Arc<dyn ErrorHandler>`).
pub type HandlerRef = Arc<dyn ErrorHandler>;

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: &'static str,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> ErrorHandler for HandlerFn<F>
where
    F: Fn(HandledError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle_error(&self, err: HandledError) {
        (self.f)(err).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
