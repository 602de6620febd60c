//! Error types for the search tree map.
//!
//! Lookups that can miss (`find`, `begin`, `end`) never fail; they hand back
//! an end cursor instead. The operations below are the ones that surface an
//! explicit error to the caller.

/// Represents errors that can occur when operating on a
/// [`SearchTreeMap`](crate::tree::SearchTreeMap).
///
/// # Examples
///
/// ```rust
/// use bstmap::error::TreeError;
/// use bstmap::tree::SearchTreeMap;
///
/// let mut map: SearchTreeMap<i32, &str> = SearchTreeMap::new();
/// assert_eq!(map.erase(&7), Err(TreeError::KeyNotFound));
/// assert_eq!(format!("{}", TreeError::KeyNotFound), "no entry found for key");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The requested key is not present in the tree.
    KeyNotFound,
    /// The operation needs at least one node, but the tree has no root.
    EmptyTree,
    /// An internal consistency check failed.
    ///
    /// The ordering invariant or the parent/child linkage is broken. This is
    /// a bug in the tree, never a condition callers can recover from.
    StructuralViolation {
        /// What exactly was found to be inconsistent.
        reason: &'static str,
    },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound => write!(formatter, "no entry found for key"),
            Self::EmptyTree => write!(formatter, "tree is empty"),
            Self::StructuralViolation { reason } => {
                write!(formatter, "structural violation: {reason}")
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// Aborts the current operation after an invariant breach was detected.
///
/// Continuing would leave the arena in a state where ownership and parent
/// links disagree, so this never returns.
#[cold]
#[track_caller]
pub(crate) fn structural_violation(reason: &'static str) -> ! {
    log::error!("search tree corrupted: {reason}");
    panic!("{}", TreeError::StructuralViolation { reason })
}
