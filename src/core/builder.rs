use std::error::Error;
use std::sync::Arc;

use crate::{
    core::{Config, async_error::AsyncError},
    error::BaseError,
    handlers::ErrorHandler,
    logger::{Logger, LoggerRef, TracingLogger},
};

/// Builder for constructing an [`AsyncError`] with optional collaborators.
///
/// Every `with_*` method sets exactly one field; calling it again overwrites
/// the previous value.
pub struct AsyncErrorBuilder {
    cfg: Config,
    logger: LoggerRef,
    base: Option<BaseError>,
    handler: Option<Arc<dyn ErrorHandler>>,
}

impl AsyncErrorBuilder {
    /// Creates a builder with the given configuration and default collaborators
    /// ([`TracingLogger`], no handler, no base error).
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            logger: Arc::new(TracingLogger::new()),
            base: None,
            handler: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the logger used for lifecycle notices and as fallback sink.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Chains every handled error beneath `err`.
    pub fn with_base_error<E>(mut self, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.base = Some(Arc::new(err));
        self
    }

    /// Same as [`with_base_error`](Self::with_base_error) for an already shared error.
    pub fn with_shared_base_error(mut self, err: BaseError) -> Self {
        self.base = Some(err);
        self
    }

    /// Sets the handler receiving every dequeued error.
    pub fn with_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets the bounded queue capacity (clamped to a minimum of 1).
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.cfg.queue_capacity = capacity;
        self
    }

    /// Builds the instance. The dispatch loop is not started.
    pub fn build(self) -> Arc<AsyncError> {
        Arc::new(AsyncError::new_internal(
            self.cfg,
            self.logger,
            self.base,
            self.handler,
        ))
    }
}

impl Default for AsyncErrorBuilder {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
