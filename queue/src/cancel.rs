//! Cancellation of suspended queue operations.
//!
//! A thread blocked in `put_cancellable` or `take_cancellable` can only be
//! released by something that holds the queue's lock and wakes its condition
//! variables. The token itself is just a shared flag; the queue's
//! [`cancel`](crate::BoundedBlockingQueue::cancel) sets it and then wakes the
//! waiters so they can observe it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable, sticky cancellation flag.
///
/// Once cancelled, a token stays cancelled. Every cancellable operation that
/// would need to suspend while holding a cancelled token fails with
/// [`QueueError::Cancelled`](crate::QueueError::Cancelled) instead. Operations
/// that can complete immediately are never refused.
///
/// # Scope of a wakeup
///
/// A token is not bound to a queue, but waking is. `queue.cancel(&token)`
/// wakes only threads suspended on `queue`. A thread holding the same token
/// while suspended on another queue keeps sleeping until that queue wakes
/// it, even though [`is_cancelled`](Self::is_cancelled) already reports
/// `true`. To release waiters on several queues, call `cancel` on each of
/// them.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
  cancelled: Arc<AtomicBool>,
}

impl CancelToken {
  /// Creates a token that is not cancelled.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns `true` once the token has been cancelled.
  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }

  /// Sets the flag. Callers must follow this with a wakeup of the waiters
  /// under the queue lock, which is what the queue's `cancel` does.
  #[inline]
  pub(crate) fn mark_cancelled(&self) {
    self.cancelled.store(true, Ordering::Release);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_the_flag() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());
    token.mark_cancelled();
    assert!(clone.is_cancelled());
  }

  #[test]
  fn cancellation_is_sticky() {
    let token = CancelToken::default();
    token.mark_cancelled();
    token.mark_cancelled();
    assert!(token.is_cancelled());
  }
}
