//! Type aliases for operations that support partial success/failure patterns.
//! Closing a subtree is the canonical case: user dispose hooks may fail, but
//! the tree state is cleaned up regardless, so the operation reports its
//! result alongside the collected failures rather than failing outright.

/// Represents a successful operation where some parts failed but didn't prevent overall success.
/// The `Vec<E>` contains errors from the failed parts that were handled gracefully.
pub type PartialSuccess<T, E> = ( T, Vec<E> );
