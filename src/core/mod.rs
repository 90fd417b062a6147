//! Queue core: lifecycle, dispatch and panic capture.
//!
//! The only public API from this module is [`AsyncError`] with its
//! [`AsyncErrorBuilder`], [`Config`] and [`Phase`].
//!
//! Internal modules:
//! - [`async_error`]: state machine, admission (`add`/`add_async`), `start_handle`/`stop`/`close`;
//! - [`dispatch`]: the single consuming loop and the handling step;
//! - [`panic`]: panic-safe task wrappers (`go`, `go_blocking`, `recover`);
//! - [`builder`]: construction with collaborators;
//! - [`config`]: construction-time settings.

mod async_error;
mod builder;
mod config;
mod dispatch;
mod panic;

#[cfg(test)]
mod tests;

pub use async_error::{AsyncError, Phase};
pub use builder::AsyncErrorBuilder;
pub use config::{Config, DEFAULT_QUEUE_CAPACITY};
