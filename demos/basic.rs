//! # Example: basic
//!
//! Demonstrates the full lifecycle of an [`AsyncError`] queue.
//!
//! Shows how to:
//! - Build an instance with a closure handler and a base error.
//! - Add errors synchronously and asynchronously.
//! - Turn a panicking task into a queued error with [`AsyncError::go`].
//! - Stop, resume and close gracefully.
//!
//! ## Flow
//! ```text
//! build() ──► start_handle()
//!     ├─► add("...").await        ──► queue ──► dispatch loop ──► handler
//!     ├─► add_async("...")        ──► queue
//!     ├─► go(panicking job)       ──► RecoveredPanic ──► queue
//!     ├─► stop() / start_handle() (buffered errors wait)
//!     └─► close().await           (drains, then rejects everything)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=aerrors=info cargo run --example basic
//! ```

use std::time::Duration;

use aerrors::{AsyncError, HandledError, HandlerFn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
#[error("payments")]
struct Payments;

async fn settle_batch() {
    tokio::time::sleep(Duration::from_millis(20)).await;
    panic!("ledger out of balance");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let handler = HandlerFn::arc("stdout", |err: HandledError| async move {
        println!("[handled] {err} (payments={})", err.is::<Payments>());
    });

    let aerr = AsyncError::builder()
        .with_handler(handler)
        .with_base_error(Payments)
        .with_queue_capacity(4)
        .build();

    aerr.start_handle()?;

    aerr.add("card declined").await?;
    aerr.add_async("gateway timeout")?;
    aerr.go(settle_batch()).await?;

    aerr.stop();
    aerr.add("queued while stopped").await?;
    println!("[demo] queued while stopped: {}", aerr.queued());
    aerr.start_handle()?;

    aerr.close().await;
    println!(
        "[demo] closed={} running={} late add rejected: {}",
        aerr.is_closed(),
        aerr.is_running(),
        aerr.add("too late").await.is_err()
    );
    Ok(())
}
