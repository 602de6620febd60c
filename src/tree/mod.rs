//! Ordered map on a binary search tree with parent links.
//!
//! - [`SearchTreeMap`]: the map itself
//! - [`Cursor`] / [`CursorMut`]: positions that step to the next key in order
//! - [`Comparator`]: the ordering strategy injected at construction
//!
//! # Structure
//!
//! Nodes live in an arena and name their children and their parent by
//! index. Child indices own, the parent index only observes. Every
//! structural change rewrites a child slot and the matching back-reference
//! in one step, so cursors can climb to the parent without an explicit
//! stack.
//!
//! # Examples
//!
//! ```rust
//! use bstmap::tree::SearchTreeMap;
//!
//! let mut map = SearchTreeMap::new();
//! for key in [8, 3, 1, 6, 4, 7, 10, 13, 14] {
//!     map.emplace(key, ());
//! }
//! let keys: Vec<i32> = map.keys().copied().collect();
//! assert_eq!(keys, vec![1, 3, 4, 6, 7, 8, 10, 13, 14]);
//!
//! // The node with two children is replaced by its in-order successor.
//! map.erase(&8).unwrap();
//! let keys: Vec<i32> = map.keys().copied().collect();
//! assert_eq!(keys, vec![1, 3, 4, 6, 7, 10, 13, 14]);
//! ```

mod balance;
mod comparator;
mod cursor;
mod iter;
mod map;
mod node;

pub use comparator::Comparator;
pub use comparator::NaturalOrder;
pub use comparator::ReverseOrder;
pub use cursor::Cursor;
pub use cursor::CursorMut;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::IterMut;
pub use iter::Keys;
pub use iter::Values;
pub use iter::ValuesMut;
pub use map::SearchTreeMap;
