//! # aerrors
//!
//! **aerrors** queues errors, including panics recovered from background
//! tasks, and hands them to a single handler asynchronously.
//!
//! Producers never deal with reporting: they push errors into a bounded queue
//! and move on. One dispatch loop drains the queue and forwards each error to
//! an [`ErrorHandler`] (or, without one, to the [`Logger`]). The instance can
//! be started, stopped and resumed, and closed gracefully once.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  producer    │   │  producer    │   │  go(fut)     │
//!     │  add().await │   │  add_async() │   │  (panic-safe)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼ RecoveredPanic
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  AsyncError                                                       │
//! │  - admission check (phase) + pending counter   (one mutex)        │
//! │  - bounded queue                     (capacity: Config, def. 10)  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │     dispatch loop      │◄── stop token
//!                       │  (one per run period)  │
//!                       └───┬────────────────┬───┘
//!                           ▼                ▼
//!                  HandledError ──►     HandledError ──►
//!                  ErrorHandler         Logger::error
//!                  (spawned, panic      (no handler set)
//!                   caught)
//! ```
//!
//! ### Lifecycle
//! ```text
//! builder().build() ──► Idle
//!   start_handle() ──► Running  (idempotent; one loop)
//!   stop()         ──► Stopped  (buffered errors wait for the next start)
//!   close().await  ──► Closing  (admissions rejected, drain if running)
//!                  ──► Closed   (terminal; queue released)
//! ```
//!
//! ## Features
//! | Area            | Description                                                | Key types / traits                      |
//! |-----------------|------------------------------------------------------------|-----------------------------------------|
//! | **Queue**       | Bounded admission, lifecycle, graceful close.              | [`AsyncError`], [`Phase`]               |
//! | **Handlers**    | Sinks receiving wrapped errors.                            | [`ErrorHandler`], [`HandlerFn`]         |
//! | **Chaining**    | Original error chained above an optional base error.       | [`HandledError`]                        |
//! | **Panics**      | Panics in spawned work become queued errors.               | [`AsyncError::go`], [`RecoveredPanic`]  |
//! | **Logging**     | Lifecycle notices and fallback reporting via `tracing`.    | [`Logger`], [`TracingLogger`]           |
//! | **Errors**      | Typed admission failures.                                  | [`AdmissionError`]                      |
//! | **Configuration** | Construction-time settings.                              | [`Config`], [`AsyncErrorBuilder`]       |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use aerrors::{AsyncError, ErrorHandler, HandledError};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("billing")]
//! struct Billing;
//!
//! struct Report;
//!
//! #[async_trait]
//! impl ErrorHandler for Report {
//!     async fn handle_error(&self, err: HandledError) {
//!         assert!(err.is::<Billing>());
//!         eprintln!("{err}");
//!     }
//! }
//!
//! async fn flaky_job() {
//!     panic!("worker crashed")
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aerr = AsyncError::builder()
//!         .with_handler(Arc::new(Report))
//!         .with_base_error(Billing)
//!         .with_queue_capacity(32)
//!         .build();
//!
//!     aerr.start_handle()?;
//!     aerr.add("invoice rejected").await?;
//!     aerr.go(flaky_job()).await?;
//!
//!     aerr.close().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod handlers;
mod logger;

// ---- Public re-exports ----

pub use crate::core::{AsyncError, AsyncErrorBuilder, Config, DEFAULT_QUEUE_CAPACITY, Phase};
pub use error::{AdmissionError, BaseError, BoxError, RecoveredPanic};
pub use handlers::{ErrorHandler, HandledError, HandlerFn, HandlerRef};
pub use logger::{Logger, LoggerRef, TracingLogger};
