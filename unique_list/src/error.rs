//! Error values reported by [HashList](crate::HashList) and
//! [ChainList](crate::ChainList).
//!
//! Rejected input items are handed back to the caller inside the error value, so
//! a failed insertion never destroys the item it was given. Absent ("null")
//! items have no representation here: every operation takes its element by
//! value, which makes the null-rejection half of the contract a compile-time
//! guarantee.

/// The reasons an operation on a duplicate-free indexed collection can fail.
///
/// All validation happens before any structural mutation, so receiving an
/// `Error` implies the collection is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<T> {
    /// The collection already contains an element equal to `item`.
    ///
    /// `existing` is the position of the conflicting resident element. For a
    /// batch operation this covers the case where a batch element collides with
    /// a pre-existing member.
    #[error("collection already contains {item:?} at index {existing}")]
    Duplicate {
        /// The rejected element, returned to the caller.
        item: T,
        /// Position of the equal element already in the collection.
        existing: usize,
    },
    /// A batch contained two equal elements.
    #[error("batch contains {item:?} more than once")]
    DuplicateInBatch {
        /// The second occurrence of the duplicated element.
        item: T,
    },
    /// A position argument was outside the valid window.
    ///
    /// Insertion accepts `0..=len`, access and removal accept `0..len`.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },
    /// A `(start, count)` window does not fit the collection.
    #[error("range of {count} starting at {start} does not fit length {len}")]
    InvalidRange {
        /// First position of the window.
        start: usize,
        /// Number of positions in the window.
        count: usize,
        /// Collection length at the time of the call.
        len: usize,
    },
}

impl<T> Error<T> {
    /// Returns the rejected element, if this error carries one.
    pub fn into_item(self) -> Option<T> {
        match self {
            Error::Duplicate { item, .. } | Error::DuplicateInBatch { item } => Some(item),
            Error::OutOfBounds { .. } | Error::InvalidRange { .. } => None,
        }
    }
    /// Returns `true` for both flavors of duplicate rejection.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Error::Duplicate { .. } | Error::DuplicateInBatch { .. }
        )
    }
}
