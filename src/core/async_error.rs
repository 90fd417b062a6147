//! # AsyncError: bounded error queue with a start/stop/close lifecycle.
//!
//! ## Architecture
//! ```text
//! producers (many)                         consumer (one)
//!   add().await ──────┐
//!   add_async() ──────┼──► [bounded mpsc] ──► dispatch loop ──► handler (spawned)
//!   go(fut) panic ────┘     (capacity N)          │         └─► logger (fallback)
//!                                                 │
//!                              stop token ────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//!  Idle ──start_handle──► Running ──stop──► Stopped ──start_handle──► Running
//!   │                       │                  │
//!   └────────close──────────┴──── close ───────┘
//!                           │
//!                  Closing (drain pending) ──► Closed (terminal)
//! ```
//!
//! ## Rules
//! - Phase and pending counter live behind one mutex; the queue synchronizes itself.
//! - Every admission increments `pending`; every handled error decrements it once.
//! - `Closing` rejects admissions immediately, so a close drain always terminates
//!   once the already admitted errors are handled.
//! - `stop` leaves buffered errors queued for a future `start_handle`.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, Notify, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{AsyncErrorBuilder, Config},
    error::{AdmissionError, BaseError, BoxError},
    handlers::HandlerRef,
    logger::LoggerRef,
};

/// Lifecycle phase of an [`AsyncError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, dispatch loop never started.
    Idle,
    /// Dispatch loop active.
    Running,
    /// Dispatch loop halted by [`AsyncError::stop`]; resumable.
    Stopped,
    /// [`AsyncError::close`] in progress: admissions rejected, draining.
    Closing,
    /// Terminal.
    Closed,
}

impl Phase {
    /// `true` for `Closing` and `Closed`: no admission will ever succeed again.
    #[inline]
    pub fn is_closed(self) -> bool {
        matches!(self, Phase::Closing | Phase::Closed)
    }
}

/// Mutable state guarded by a single lock.
pub(super) struct State {
    pub(super) phase: Phase,
    /// Errors admitted but not yet handled.
    pub(super) pending: usize,
    /// Stop token of the active dispatch loop.
    pub(super) stop: Option<CancellationToken>,
    /// Producer side of the queue; released on close.
    pub(super) tx: Option<mpsc::Sender<BoxError>>,
}

/// Asynchronous error queue drained by a single dispatch loop.
///
/// Errors are handed to the configured [`ErrorHandler`](crate::ErrorHandler)
/// or, without one, reported through the [`Logger`](crate::Logger).
///
/// The instance is shared as `Arc<AsyncError>`; operations that spawn tasks
/// (`add_async`, `start_handle`, `go`) require a Tokio runtime context.
///
/// ## Example
/// ```rust
/// use aerrors::{AsyncError, HandlerFn, HandledError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), aerrors::AdmissionError> {
///     let aerr = AsyncError::builder()
///         .with_handler(HandlerFn::arc("stderr", |err: HandledError| async move {
///             eprintln!("{err}");
///         }))
///         .build();
///
///     aerr.start_handle()?;
///     aerr.add("connection reset").await?;
///     aerr.close().await; // waits until the error above is handled
///     Ok(())
/// }
/// ```
pub struct AsyncError {
    pub(super) logger: LoggerRef,
    pub(super) base: Option<BaseError>,
    pub(super) handler: Option<HandlerRef>,
    pub(super) capacity: usize,
    pub(super) state: Mutex<State>,
    /// Consumer side; held by the dispatch loop for the whole running period.
    pub(super) rx: AsyncMutex<mpsc::Receiver<BoxError>>,
    /// Signalled when `pending` drops to zero.
    pub(super) drained: Notify,
}

impl AsyncError {
    /// Builds an instance with the default configuration.
    pub fn new() -> Arc<Self> {
        Self::builder().build()
    }

    /// Returns a builder with the default configuration.
    pub fn builder() -> AsyncErrorBuilder {
        AsyncErrorBuilder::default()
    }

    pub(crate) fn new_internal(
        cfg: Config,
        logger: LoggerRef,
        base: Option<BaseError>,
        handler: Option<HandlerRef>,
    ) -> Self {
        let capacity = cfg.queue_capacity_clamped();
        let (tx, rx) = mpsc::channel::<BoxError>(capacity);

        Self {
            logger,
            base,
            handler,
            capacity,
            state: Mutex::new(State {
                phase: Phase::Idle,
                pending: 0,
                stop: None,
                tx: Some(tx),
            }),
            rx: AsyncMutex::new(rx),
            drained: Notify::new(),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().phase.is_closed()
    }

    /// `true` while a dispatch loop started by [`start_handle`](Self::start_handle) is active.
    ///
    /// `false` from the moment [`close`](Self::close) begins, even while it is
    /// still draining admitted errors: running always implies not closed.
    pub fn is_running(&self) -> bool {
        self.state.lock().phase == Phase::Running
    }

    /// Errors admitted but not yet handled (queued, parked or in a handler).
    pub fn pending(&self) -> usize {
        self.state.lock().pending
    }

    /// Errors currently buffered in the queue.
    pub fn queued(&self) -> usize {
        let state = self.state.lock();
        state
            .tx
            .as_ref()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .unwrap_or(0)
    }

    /// Fixed queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Puts `err` in the queue, suspending while the queue is full.
    ///
    /// Errors added by one producer are handled in the order they were added.
    ///
    /// Cancel-safe: dropping the future before it resolves withdraws the
    /// admission and the error is never queued.
    ///
    /// # Errors
    /// [`AdmissionError::AddClosed`] if the instance is closed or closing.
    pub async fn add<E>(&self, err: E) -> Result<(), AdmissionError>
    where
        E: Into<BoxError>,
    {
        let tx = self.admit(AdmissionError::AddClosed)?;
        let admission = Admission::new(self);
        tx.send(err.into())
            .await
            .map_err(|_| AdmissionError::AddClosed)?;
        admission.commit();
        Ok(())
    }

    /// Puts `err` in the queue from a spawned task; never blocks the caller.
    ///
    /// If the queue is full, the error waits on that task until the dispatch
    /// loop frees a slot. Concurrent `add_async` calls race to enqueue.
    ///
    /// # Errors
    /// [`AdmissionError::AddAsyncClosed`] if the instance is closed or closing.
    pub fn add_async<E>(self: &Arc<Self>, err: E) -> Result<(), AdmissionError>
    where
        E: Into<BoxError>,
    {
        let tx = self.admit(AdmissionError::AddAsyncClosed)?;
        let err = err.into();
        let me = Arc::clone(self);

        tokio::spawn(async move {
            let admission = Admission::new(&me);
            // Receiver released by close: the error is dropped with the queue.
            if tx.send(err).await.is_ok() {
                admission.commit();
            }
        });
        Ok(())
    }

    /// Starts the dispatch loop.
    ///
    /// No-op while already running; at most one loop exists per instance.
    ///
    /// # Errors
    /// [`AdmissionError::StartClosed`] if the instance is closed or closing.
    pub fn start_handle(self: &Arc<Self>) -> Result<(), AdmissionError> {
        let token = {
            let mut state = self.state.lock();
            match state.phase {
                Phase::Closing | Phase::Closed => return Err(AdmissionError::StartClosed),
                Phase::Running => return Ok(()),
                Phase::Idle | Phase::Stopped => {}
            }
            let token = CancellationToken::new();
            state.stop = Some(token.clone());
            state.phase = Phase::Running;
            token
        };

        tokio::spawn(Arc::clone(self).dispatch_loop(token));
        Ok(())
    }

    /// Halts the dispatch loop immediately.
    ///
    /// Buffered errors stay queued and are handled after the next
    /// [`start_handle`](Self::start_handle). In-flight handler invocations are
    /// not awaited. No-op unless running.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if state.phase != Phase::Running {
            return;
        }
        if let Some(token) = state.stop.take() {
            token.cancel();
        }
        state.phase = Phase::Stopped;
    }

    /// Closes the instance gracefully. Idempotent.
    ///
    /// 1. Rejects new admissions (phase `Closing`).
    /// 2. If running, waits until every admitted error has been handled.
    /// 3. Stops the loop, releases the queue, marks `Closed`.
    ///
    /// Errors still buffered on a stopped or never started instance are dropped
    /// (and no longer counted as pending).
    ///
    /// ### Notes
    /// There is no timeout: a handler that never completes blocks `close`
    /// forever. Wrap the call in `tokio::time::timeout` if that matters.
    /// A second call made while the first is still draining returns at once.
    pub async fn close(&self) {
        let was_running = {
            let mut state = self.state.lock();
            let was_running = match state.phase {
                Phase::Closing | Phase::Closed => return,
                Phase::Running => true,
                Phase::Idle | Phase::Stopped => false,
            };
            state.phase = Phase::Closing;
            was_running
        };

        if was_running {
            self.wait_drained().await;
        }

        {
            let mut state = self.state.lock();
            if let Some(token) = state.stop.take() {
                token.cancel();
            }
            state.tx = None;
            state.phase = Phase::Closed;
        }

        let mut rx = self.rx.lock().await;
        rx.close();
        while rx.try_recv().is_ok() {
            self.complete_one();
        }
        drop(rx);

        self.logger.info("aerrors: closed");
    }

    /// Checks the phase and counts the admission under the state lock.
    fn admit(&self, rejected: AdmissionError) -> Result<mpsc::Sender<BoxError>, AdmissionError> {
        let mut state = self.state.lock();
        if state.phase.is_closed() {
            return Err(rejected);
        }
        let tx = state.tx.clone().ok_or(rejected)?;
        state.pending += 1;
        Ok(tx)
    }

    /// Balances one admission; wakes a draining `close` at zero.
    pub(super) fn complete_one(&self) {
        let mut state = self.state.lock();
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            self.drained.notify_waiters();
        }
    }

    async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let pending = self.state.lock().pending;
            if pending == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Counted admission whose error has not reached the queue yet.
///
/// Dropped uncommitted (send failed or the future was cancelled), it balances
/// the `pending` increment made by `admit`.
struct Admission<'a> {
    owner: &'a AsyncError,
    committed: bool,
}

impl<'a> Admission<'a> {
    fn new(owner: &'a AsyncError) -> Self {
        Self {
            owner,
            committed: false,
        }
    }

    /// The error is in the queue; the dispatch loop now owns the count.
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.owner.complete_one();
        }
    }
}
