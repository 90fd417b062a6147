//! Error types used by the aerrors queue.
//!
//! This module defines:
//!
//! - [`AdmissionError`] — synchronous rejections returned to callers of the queue.
//! - [`RecoveredPanic`] — a panic captured by the panic-safe wrapper, queued like any other error.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;
use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

/// Boxed error accepted by the queue.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Shared base error every handled error is chained beneath.
pub type BaseError = Arc<dyn Error + Send + Sync + 'static>;

/// # Errors returned synchronously by queue operations.
///
/// All variants mean the instance has been closed (or is closing) and will never
/// accept work again. Build a new instance instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    /// [`add`](crate::AsyncError::add) was called on a closed instance.
    #[error("aerrors: can't add error to closed queue")]
    AddClosed,

    /// [`add_async`](crate::AsyncError::add_async) was called on a closed instance.
    #[error("aerrors: can't async add error to closed queue")]
    AddAsyncClosed,

    /// [`start_handle`](crate::AsyncError::start_handle) was called on a closed instance.
    #[error("aerrors: can't start handle for closed instance")]
    StartClosed,
}

impl AdmissionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use aerrors::AdmissionError;
    ///
    /// assert_eq!(AdmissionError::AddClosed.as_label(), "admission_add_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AdmissionError::AddClosed => "admission_add_closed",
            AdmissionError::AddAsyncClosed => "admission_add_async_closed",
            AdmissionError::StartClosed => "admission_start_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            AdmissionError::AddClosed => "add rejected: instance closed".to_string(),
            AdmissionError::AddAsyncClosed => "async add rejected: instance closed".to_string(),
            AdmissionError::StartClosed => "start rejected: instance closed".to_string(),
        }
    }
}

/// # A panic captured by the panic-safe wrapper.
///
/// Carries the textual form of the panic payload. `&'static str` and `String`
/// payloads are preserved; anything else becomes `"unknown panic"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("recovered from panic: {payload}")]
pub struct RecoveredPanic {
    /// Panic payload rendered as text.
    pub payload: String,
}

impl RecoveredPanic {
    /// Builds a recovered panic from a raw `catch_unwind` payload.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let any = &*payload;
        let payload = if let Some(msg) = any.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = any.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { payload }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        "recovered_panic"
    }
}
