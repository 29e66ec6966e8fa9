// src/error.rs

use core::fmt;

// Errors that hand the rejected item back share `into_inner`, `Display` and `Error`.
macro_rules! impl_error_for_enum_with_inner {
    (
        $enum_name:ident < $generic_param:ident >,
        $($variant:ident ( $message:expr ) ),+
        $(,)?
    ) => {
        impl<$generic_param> $enum_name<$generic_param> {
            /// Consumes the error, returning the item that could not be inserted.
            #[inline]
            pub fn into_inner(self) -> $generic_param {
                match self {
                    $( $enum_name::$variant(v) => v, )+
                }
            }
        }

        impl<$generic_param> fmt::Display for $enum_name<$generic_param> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( $enum_name::$variant(_) => f.write_str($message), )+
                }
            }
        }

        impl<$generic_param> std::error::Error for $enum_name<$generic_param> {}
    };
}

/// Error returned by construction and by the blocking operations of a
/// [`BoundedBlockingQueue`](crate::BoundedBlockingQueue).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QueueError {
  /// The requested capacity was zero, negative, or not representable as `usize`.
  InvalidCapacity,
  /// An absent item was offered for insertion.
  InvalidArgument,
  /// A suspended `put`/`take` was cancelled through its [`CancelToken`](crate::CancelToken).
  /// The queue is unchanged.
  Cancelled,
  /// The deadline of a timed retrieval elapsed while the queue stayed empty.
  Timeout,
}

impl std::error::Error for QueueError {}
impl fmt::Display for QueueError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueueError::InvalidCapacity => write!(f, "queue capacity must be greater than zero"),
      QueueError::InvalidArgument => write!(f, "cannot insert an absent item"),
      QueueError::Cancelled => write!(f, "queue operation cancelled while waiting"),
      QueueError::Timeout => write!(f, "queue operation timed out"),
    }
  }
}

/// Error returned by `try_put` when the item could not be inserted without
/// blocking. The item is returned.
#[derive(PartialEq, Eq, Clone)]
pub enum TryPutError<T> {
  /// The queue is at capacity.
  Full(T),
}

impl<T> fmt::Debug for TryPutError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPutError::Full(_) => write!(f, "TryPutError::Full(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(TryPutError<T>, Full("queue full"));

/// Error returned by `put_timeout` when no space became available before the
/// deadline. The item is returned.
#[derive(PartialEq, Eq, Clone)]
pub enum PutTimeoutError<T> {
  /// The deadline elapsed while the queue stayed at capacity.
  Timeout(T),
}

impl<T> fmt::Debug for PutTimeoutError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PutTimeoutError::Timeout(_) => write!(f, "PutTimeoutError::Timeout(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(PutTimeoutError<T>, Timeout("queue put timed out"));

/// Error returned by `try_take` when no item could be removed without blocking.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TryTakeError {
  /// The queue holds no items.
  Empty,
}
impl std::error::Error for TryTakeError {}
impl fmt::Display for TryTakeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryTakeError::Empty => write!(f, "queue empty"),
    }
  }
}
