use std::error::Error;

use crate::logger::Logger;

/// Default logger: forwards to the `tracing` facade under the `aerrors` target.
///
/// Install any `tracing` subscriber to see the output, e.g.
/// `tracing_subscriber::fmt().with_env_filter("aerrors=info").init()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    /// Construct a new [`TracingLogger`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!(target: "aerrors", "{msg}");
    }

    fn error(&self, err: &(dyn Error + 'static), msg: &str) {
        tracing::error!(target: "aerrors", error = %err, "{msg}");
    }
}
