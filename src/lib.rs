//! # bstmap
//!
//! An ordered map backed by a plain binary search tree.
//!
//! ## Overview
//!
//! - **Ordered map**: [`SearchTreeMap`](tree::SearchTreeMap) with find,
//!   insert (first value wins), get-or-insert, erase and ordered iteration
//! - **Cursors**: positions that step through keys in order using parent
//!   links instead of a traversal stack
//! - **Balancing on demand**: [`balance`](tree::SearchTreeMap::balance)
//!   rebuilds a minimum-height tree; nothing rotates implicitly
//! - **Pluggable order**: any [`Comparator`](tree::Comparator), including
//!   plain closures
//!
//! ## Example
//!
//! ```rust
//! use bstmap::prelude::*;
//!
//! let mut map = SearchTreeMap::new();
//! map.emplace(2, "two");
//! map.emplace(1, "one");
//! assert_eq!(map.find(&1).value(), Some(&"one"));
//! assert_eq!(map.erase(&5), Err(TreeError::KeyNotFound));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use bstmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::*;
    pub use crate::tree::*;
}

pub mod error;
pub mod tree;
