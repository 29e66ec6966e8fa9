//! The guarded state of a [`BoundedBlockingQueue`](super::BoundedBlockingQueue).
//!
//! Nothing in here locks, waits or signals. `State` only ever lives inside
//! the queue's mutex, so holding a `&mut State<T>` is proof that the caller
//! holds the lock.

use std::collections::VecDeque;
use std::fmt;

/// Upper bound on the slots reserved up front. Larger queues grow on demand.
const INITIAL_ALLOCATION_LIMIT: usize = 1024;

pub(crate) struct State<T> {
  /// Head is the oldest element. `elements.len()` is the queue's count.
  elements: VecDeque<T>,
  capacity: usize,
}

impl<T> fmt::Debug for State<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("State")
      .field("len", &self.elements.len())
      .field("capacity", &self.capacity)
      .finish()
  }
}

impl<T> State<T> {
  /// `capacity` must already be validated as non-zero.
  pub(crate) fn new(capacity: usize) -> Self {
    debug_assert!(capacity > 0);
    Self {
      elements: VecDeque::with_capacity(capacity.min(INITIAL_ALLOCATION_LIMIT)),
      capacity,
    }
  }

  /// Appends `item` at the tail. Hands the item back if the queue is full.
  #[inline]
  pub(crate) fn link_last(&mut self, item: T) -> Result<(), T> {
    if self.elements.len() >= self.capacity {
      return Err(item);
    }
    self.elements.push_back(item);
    Ok(())
  }

  /// Removes and returns the head, or `None` if the queue is empty.
  #[inline]
  pub(crate) fn unlink_first(&mut self) -> Option<T> {
    self.elements.pop_front()
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.elements.len()
  }

  #[inline]
  pub(crate) fn capacity(&self) -> usize {
    self.capacity
  }
}
