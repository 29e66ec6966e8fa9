//! A bounded, blocking FIFO queue guarded by one mutex and two condition
//! variables.
//!
//! `put` waits on "not full" while the queue is at capacity, `take` waits on
//! "not empty" while it is empty. Both share the same `parking_lot::Mutex`,
//! so the element sequence and its length are only ever observed together.
//! Every wait sits in a loop that re-checks its condition after waking: a
//! wakeup only means the state *may* have changed.

mod state;


use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::error::{PutTimeoutError, QueueError, TryPutError, TryTakeError};
use crate::telemetry::{self, counters, QUEUE_LOCATION};

use self::state::State;

/// Why a cancellable or timed wait gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitAbort {
  Cancelled,
  TimedOut,
}

impl From<WaitAbort> for QueueError {
  fn from(abort: WaitAbort) -> Self {
    match abort {
      WaitAbort::Cancelled => QueueError::Cancelled,
      WaitAbort::TimedOut => QueueError::Timeout,
    }
  }
}

/// A bounded, thread-safe FIFO queue with blocking `put` and `take`.
///
/// Share it between threads with an `Arc`. Items come out in exactly the
/// order they went in; which of several blocked threads is woken first is up
/// to the condition variable.
///
/// ```
/// use fibre_queue::BoundedBlockingQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(BoundedBlockingQueue::new(1).unwrap());
/// queue.put(1);
///
/// let producer = {
///   let queue = Arc::clone(&queue);
///   thread::spawn(move || queue.put(2)) // blocks until `take` frees the slot
/// };
///
/// assert_eq!(queue.take(), 1);
/// producer.join().unwrap();
/// assert_eq!(queue.take(), 2);
/// ```
pub struct BoundedBlockingQueue<T> {
  capacity: usize,
  state: Mutex<State<T>>,
  not_empty: Condvar,
  not_full: Condvar,
}

impl<T> fmt::Debug for BoundedBlockingQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.lock();
    f.debug_struct("BoundedBlockingQueue")
      .field("capacity", &self.capacity)
      .field("len", &state.len())
      .finish()
  }
}

impl<T> Default for BoundedBlockingQueue<T> {
  /// Same as [`BoundedBlockingQueue::unbounded`].
  fn default() -> Self {
    Self::unbounded()
  }
}

impl<T> BoundedBlockingQueue<T> {
  /// Creates an empty queue holding at most `capacity` items.
  ///
  /// Accepts any integer type. Zero, negative values and values that do not
  /// fit in `usize` fail with [`QueueError::InvalidCapacity`].
  pub fn new<C>(capacity: C) -> Result<Self, QueueError>
  where
    C: TryInto<usize>,
  {
    let capacity = capacity
      .try_into()
      .ok()
      .filter(|&capacity| capacity > 0)
      .ok_or(QueueError::InvalidCapacity)?;
    Ok(Self::with_valid_capacity(capacity))
  }

  /// Creates an empty queue whose capacity is `usize::MAX`.
  ///
  /// The capacity check still runs on every insertion, it just cannot be hit
  /// before memory runs out.
  pub fn unbounded() -> Self {
    Self::with_valid_capacity(usize::MAX)
  }

  fn with_valid_capacity(capacity: usize) -> Self {
    debug!(capacity, "created bounded blocking queue");
    Self {
      capacity,
      state: Mutex::new(State::new(capacity)),
      not_empty: Condvar::new(),
      not_full: Condvar::new(),
    }
  }

  // --- Insertion ---

  /// Appends `item` at the tail, blocking while the queue is full.
  ///
  /// Returns once the item is visible to `take`.
  pub fn put(&self, item: T) {
    let mut state = self.state.lock();
    let mut item = item;
    loop {
      match state.link_last(item) {
        Ok(()) => {
          self.not_empty.notify_one();
          return;
        }
        Err(rejected) => item = rejected,
      }
      self.note_put_blocked(&state);
      self.not_full.wait(&mut state);
      self.note_woken(&state, "put");
    }
  }

  /// Like [`put`](Self::put), for callers whose item may be absent.
  ///
  /// `None` fails with [`QueueError::InvalidArgument`] without touching the
  /// lock or the queue.
  pub fn put_some(&self, item: Option<T>) -> Result<(), QueueError> {
    let item = item.ok_or(QueueError::InvalidArgument)?;
    self.put(item);
    Ok(())
  }

  /// Like [`put`](Self::put), but gives up with [`QueueError::Cancelled`]
  /// if `token` is cancelled while the queue is full.
  ///
  /// A cancelled insertion drops `item`; the queue is left unchanged. If
  /// there is room, the item is inserted even when `token` is already
  /// cancelled.
  pub fn put_cancellable(&self, item: T, token: &CancelToken) -> Result<(), QueueError> {
    self
      .put_until(item, Some(token), None)
      .map_err(|(_item, abort)| abort.into())
  }

  /// Like [`put`](Self::put), but waits at most `timeout` for space.
  /// On timeout the item is handed back.
  ///
  /// A timeout too large to express as an `Instant` (e.g. `Duration::MAX`)
  /// waits without a deadline.
  pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutTimeoutError<T>> {
    let deadline = Instant::now().checked_add(timeout);
    self
      .put_until(item, None, deadline)
      .map_err(|(item, _abort)| PutTimeoutError::Timeout(item))
  }

  /// Inserts `item` only if there is room right now.
  pub fn try_put(&self, item: T) -> Result<(), TryPutError<T>> {
    let mut state = self.state.lock();
    state.link_last(item).map_err(TryPutError::Full)?;
    self.not_empty.notify_one();
    Ok(())
  }

  fn put_until(
    &self,
    item: T,
    token: Option<&CancelToken>,
    deadline: Option<Instant>,
  ) -> Result<(), (T, WaitAbort)> {
    let mut state = self.state.lock();
    let mut item = item;
    loop {
      // Room wins over cancellation: a woken waiter that can proceed does,
      // so it never swallows a signal meant for someone else.
      match state.link_last(item) {
        Ok(()) => {
          self.not_empty.notify_one();
          return Ok(());
        }
        Err(rejected) => item = rejected,
      }
      if let Some(abort) = self.should_abort(&state, token, deadline) {
        return Err((item, abort));
      }
      self.note_put_blocked(&state);
      Self::wait(&self.not_full, &mut state, deadline);
      self.note_woken(&state, "put");
    }
  }

  // --- Retrieval ---

  /// Removes and returns the oldest item, blocking while the queue is empty.
  pub fn take(&self) -> T {
    let mut state = self.state.lock();
    loop {
      if let Some(item) = state.unlink_first() {
        self.not_full.notify_one();
        return item;
      }
      self.note_take_blocked(&state);
      self.not_empty.wait(&mut state);
      self.note_woken(&state, "take");
    }
  }

  /// Like [`take`](Self::take), but gives up with [`QueueError::Cancelled`]
  /// if `token` is cancelled while the queue is empty. Nothing is removed
  /// from the queue in that case.
  pub fn take_cancellable(&self, token: &CancelToken) -> Result<T, QueueError> {
    self.take_until(Some(token), None).map_err(QueueError::from)
  }

  /// Like [`take`](Self::take), but waits at most `timeout` for an item and
  /// fails with [`QueueError::Timeout`] otherwise. As with
  /// [`put_timeout`](Self::put_timeout), an unrepresentable deadline means
  /// no deadline.
  pub fn take_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
    let deadline = Instant::now().checked_add(timeout);
    self.take_until(None, deadline).map_err(QueueError::from)
  }

  /// Removes the oldest item only if one is available right now.
  pub fn try_take(&self) -> Result<T, TryTakeError> {
    let mut state = self.state.lock();
    let item = state.unlink_first().ok_or(TryTakeError::Empty)?;
    self.not_full.notify_one();
    Ok(item)
  }

  fn take_until(
    &self,
    token: Option<&CancelToken>,
    deadline: Option<Instant>,
  ) -> Result<T, WaitAbort> {
    let mut state = self.state.lock();
    loop {
      if let Some(item) = state.unlink_first() {
        self.not_full.notify_one();
        return Ok(item);
      }
      if let Some(abort) = self.should_abort(&state, token, deadline) {
        return Err(abort);
      }
      self.note_take_blocked(&state);
      Self::wait(&self.not_empty, &mut state, deadline);
      self.note_woken(&state, "take");
    }
  }

  // --- Cancellation ---

  /// Cancels `token` and wakes every thread waiting on this queue.
  ///
  /// Waiters holding `token` return [`QueueError::Cancelled`] unless their
  /// condition has become satisfied in the meantime; all others re-check and
  /// go back to sleep. The wakeup is issued under the queue lock, so a waiter
  /// either sees the flag before it suspends or is already suspended when
  /// the broadcast arrives.
  ///
  /// Waits on *other* queues that use the same token notice the cancellation
  /// the next time they wake.
  pub fn cancel(&self, token: &CancelToken) {
    token.mark_cancelled();
    let state = self.state.lock();
    trace!(capacity = self.capacity, len = state.len(), "cancelling queue waiters");
    self.not_empty.notify_all();
    self.not_full.notify_all();
  }

  // --- Inspection ---

  /// Returns the maximum number of items the queue can hold.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the number of items currently queued.
  pub fn len(&self) -> usize {
    self.state.lock().len()
  }

  /// Returns `true` if the queue holds no items.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if a `put` would block right now.
  pub fn is_full(&self) -> bool {
    self.len() == self.capacity
  }

  /// Returns how many more items fit before `put` blocks.
  pub fn remaining_capacity(&self) -> usize {
    self.capacity - self.len()
  }

  // --- Wait plumbing ---

  /// Suspends on `condvar`, releasing the lock for the duration of the wait.
  /// Returning says nothing about the state; callers re-check.
  fn wait(condvar: &Condvar, state: &mut MutexGuard<'_, State<T>>, deadline: Option<Instant>) {
    match deadline {
      Some(deadline) => {
        condvar.wait_until(state, deadline);
      }
      None => condvar.wait(state),
    }
  }

  fn should_abort(
    &self,
    state: &State<T>,
    token: Option<&CancelToken>,
    deadline: Option<Instant>,
  ) -> Option<WaitAbort> {
    if token.is_some_and(CancelToken::is_cancelled) {
      trace!(capacity = self.capacity, len = state.len(), "queue wait cancelled");
      telemetry::increment_counter(QUEUE_LOCATION, counters::CANCELLED);
      telemetry::log_event(QUEUE_LOCATION, "WaitCancelled", None);
      return Some(WaitAbort::Cancelled);
    }
    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
      trace!(capacity = self.capacity, len = state.len(), "queue wait timed out");
      telemetry::increment_counter(QUEUE_LOCATION, counters::TIMED_OUT);
      telemetry::log_event(QUEUE_LOCATION, "WaitTimedOut", None);
      return Some(WaitAbort::TimedOut);
    }
    None
  }

  fn note_put_blocked(&self, state: &State<T>) {
    trace!(capacity = state.capacity(), len = state.len(), "put waiting for space");
    telemetry::increment_counter(QUEUE_LOCATION, counters::PUT_BLOCKED);
    telemetry::log_event(QUEUE_LOCATION, "PutBlocked", None);
  }

  fn note_take_blocked(&self, state: &State<T>) {
    trace!(capacity = state.capacity(), len = state.len(), "take waiting for an item");
    telemetry::increment_counter(QUEUE_LOCATION, counters::TAKE_BLOCKED);
    telemetry::log_event(QUEUE_LOCATION, "TakeBlocked", None);
  }

  fn note_woken(&self, state: &State<T>, operation: &'static str) {
    trace!(operation, capacity = self.capacity, len = state.len(), "queue waiter woke up");
  }
}
