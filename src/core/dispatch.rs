//! # Dispatch loop and handling step.
//!
//! ## Event flow
//! ```text
//! loop select (biased):
//!   stop token cancelled ──► exit (buffered errors stay queued)
//!   rx.recv() ─► Some(err) ──► HandledError::new(err, base)
//!            │                     ├─ handler set  ─► spawn handler.handle_error()
//!            │                     │                   └─ panic caught → logger.error
//!            │                     │                   └─ complete_one()
//!            │                     └─ no handler   ─► logger.error(), complete_one()
//!            └─ None (queue released) ──► exit
//! ```
//!
//! ## Rules
//! - The loop never awaits a handler invocation.
//! - `pending` is decremented when the handling step finishes, so a draining
//!   `close` also waits for in-flight handler invocations.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::{
    core::async_error::AsyncError,
    error::{BoxError, RecoveredPanic},
    handlers::HandledError,
};

impl AsyncError {
    /// Drains the queue until `stop` is cancelled or the queue is released.
    pub(super) async fn dispatch_loop(self: Arc<Self>, stop: CancellationToken) {
        // A loop from a previous running period may still hold the receiver.
        let mut rx = tokio::select! {
            _ = stop.cancelled() => return,
            guard = self.rx.lock() => guard,
        };
        self.logger.info("aerrors: start");

        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                next = rx.recv() => match next {
                    Some(err) => self.handle(err),
                    None => break,
                },
            }
        }

        self.logger.info("aerrors: stop");
    }

    /// Wraps `err` and hands it to the handler or the fallback logger.
    fn handle(self: &Arc<Self>, err: BoxError) {
        let handled = HandledError::new(err, self.base.clone());

        let Some(handler) = self.handler.as_ref() else {
            self.logger.error(&handled, "aerrors: handled error");
            self.complete_one();
            return;
        };

        let handler = Arc::clone(handler);
        let me = Arc::clone(self);
        tokio::spawn(async move {
            let fut = handler.handle_error(handled);

            if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                let panic = RecoveredPanic::from_payload(panic_err);
                me.logger.error(
                    &panic,
                    &format!("aerrors: handler {} panicked", handler.name()),
                );
            }
            me.complete_one();
        });
    }
}
