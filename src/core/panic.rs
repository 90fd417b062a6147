//! # Panic-safe wrappers.
//!
//! Converts panics in background work into queued [`RecoveredPanic`] errors
//! instead of losing them with the task.
//!
//! ```text
//! go(fut) ──► spawn ──► catch_unwind(fut)
//!                          ├─ Ok  ──► done
//!                          └─ Err ──► RecoveredPanic ──► add() (rejected if closed → dropped)
//! ```
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if the panicking work held a lock.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::{core::async_error::AsyncError, error::RecoveredPanic};

impl AsyncError {
    /// Queues a caught panic payload as a [`RecoveredPanic`] without blocking.
    ///
    /// Dropped silently if the instance is closed.
    ///
    /// ## Example
    /// ```rust
    /// fn parse() -> u32 {
    ///     panic!("bad input")
    /// }
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let aerr = aerrors::AsyncError::new();
    /// if let Err(payload) = std::panic::catch_unwind(parse) {
    ///     aerr.recover(payload);
    /// }
    /// assert_eq!(aerr.pending(), 1);
    /// # }
    /// ```
    pub fn recover(self: &Arc<Self>, payload: Box<dyn Any + Send>) {
        let _ = self.add_async(RecoveredPanic::from_payload(payload));
    }

    /// Runs `fut` on a new task; a panic inside it becomes one queued error.
    ///
    /// The returned handle completes after the error (if any) is admitted.
    pub fn go<F>(self: &Arc<Self>, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let me = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(payload) = AssertUnwindSafe(fut).catch_unwind().await {
                let _ = me.add(RecoveredPanic::from_payload(payload)).await;
            }
        })
    }

    /// Runs `f` on the blocking pool; a panic inside it becomes one queued error.
    pub fn go_blocking<F>(self: &Arc<Self>, f: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let me = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
                me.recover(payload);
            }
        })
    }
}
