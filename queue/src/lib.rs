//! A bounded, blocking FIFO queue for threads.
//!
//! [`BoundedBlockingQueue`] is the classic lock-and-two-condition-variables
//! queue: producers block in [`put`](BoundedBlockingQueue::put) while it is
//! full, consumers block in [`take`](BoundedBlockingQueue::take) while it is
//! empty. On top of that it offers non-blocking (`try_*`), timed (`*_timeout`)
//! and cancellable (`*_cancellable`) variants of both operations.
//!
//! The queue logs its suspension, cancellation and timeout points through
//! `tracing` at `trace` level. With the `telemetry` feature it also records
//! counters and events in a global collector, see [`telemetry`].

pub mod error;
pub mod telemetry;

mod bounded;
mod cancel;

pub use bounded::BoundedBlockingQueue;
pub use cancel::CancelToken;
pub use error::{PutTimeoutError, QueueError, TryPutError, TryTakeError};

// Helper function to check if a type is Send + Sync.
// Useful for static assertions in generic code.
#[allow(dead_code)]
fn assert_send_sync<T: Send + Sync>() {}

#[allow(dead_code)]
fn queue_is_send_sync() {
  assert_send_sync::<BoundedBlockingQueue<String>>();
  assert_send_sync::<CancelToken>();
}
