//! Ordered map on a plain (non self-balancing) binary search tree.
//!
//! This module provides [`SearchTreeMap`], a mutable ordered map whose nodes
//! keep a back-reference to their parent.
//!
//! # Overview
//!
//! - O(height) `find`, `insert`, `erase`
//! - O(1) amortized cursor step, O(height) worst case
//! - O(N) `balance`, which rebuilds a minimum-height tree
//! - O(1) `len` and `is_empty`
//!
//! The tree never rotates on its own. Inserting keys in sorted order yields a
//! chain whose height equals the number of entries; call
//! [`SearchTreeMap::balance`] to rebuild it.
//!
//! # Examples
//!
//! ```rust
//! use bstmap::tree::SearchTreeMap;
//!
//! let mut map = SearchTreeMap::new();
//! for key in 1..=7 {
//!     map.emplace(key, key * key);
//! }
//! assert_eq!(map.height(), 7);
//!
//! map.balance();
//! assert_eq!(map.height(), 3);
//! assert_eq!(map.get(&4), Some(&16));
//! ```

use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::ops::Index;

use smallvec::SmallVec;

use super::comparator::{Comparator, NaturalOrder};
use super::cursor::{Cursor, CursorMut};
use super::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use super::node::{Node, NodeArena, NodeId, Side, Slot, WALK_STACK_INLINE};
use crate::error::{TreeError, structural_violation};

// =============================================================================
// SearchTreeMap Definition
// =============================================================================

/// An ordered map backed by an unbalanced binary search tree.
///
/// Keys are ordered by the comparator `C`, [`NaturalOrder`] by default.
/// Inserting an existing key never overwrites: the first value stays.
///
/// # Time Complexity
///
/// | Operation      | Complexity  |
/// |----------------|-------------|
/// | `new`          | O(1)        |
/// | `find`         | O(height)   |
/// | `insert`       | O(height)   |
/// | `erase`        | O(height)   |
/// | `balance`      | O(N)        |
/// | `clone`        | O(N)        |
/// | `len`          | O(1)        |
///
/// # Examples
///
/// ```rust
/// use bstmap::tree::SearchTreeMap;
///
/// let mut map = SearchTreeMap::new();
/// let (_, inserted) = map.insert((3, "three"));
/// assert!(inserted);
/// let (existing, inserted) = map.insert((3, "THREE"));
/// assert!(!inserted);
/// assert_eq!(existing.value(), Some(&"three"));
/// ```
pub struct SearchTreeMap<K, V, C = NaturalOrder> {
    arena: NodeArena<K, V>,
    comparator: C,
}

impl<K, V> SearchTreeMap<K, V> {
    /// Creates an empty map ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let map: SearchTreeMap<i32, String> = SearchTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            comparator: NaturalOrder,
        }
    }
}

impl<K, V, C> SearchTreeMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            comparator,
        }
    }

    /// Creates an empty map ordered by `comparator` with room for `capacity`
    /// entries before the node arena reallocates.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            comparator,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.root.is_none()
    }

    /// Returns the number of nodes on the longest root-to-leaf path, `0` for
    /// an empty map.
    #[must_use]
    pub fn height(&self) -> usize {
        self.arena.height()
    }

    pub(super) const fn arena_mut(&mut self) -> &mut NodeArena<K, V> {
        &mut self.arena
    }

    /// Returns the comparator that orders this map.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        log::debug!("clearing {} entries", self.len());
        self.arena.clear();
    }

    /// Moves every entry out into a new map, leaving this one empty.
    ///
    /// Both maps keep the same comparator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let mut source: SearchTreeMap<i32, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
    /// let moved = source.take();
    /// assert!(source.is_empty());
    /// assert_eq!(moved.len(), 2);
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        Self {
            arena: mem::take(&mut self.arena),
            comparator: self.comparator.clone(),
        }
    }

    // =========================================================================
    // Cursors
    // =========================================================================

    /// Returns a cursor at the smallest key, or the end cursor when empty.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        let first = self.arena.root.map(|root| self.arena.leftmost_from(root));
        Cursor::new(&self.arena, first)
    }

    /// Returns the end cursor, one past the largest key.
    pub const fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.arena, None)
    }

    /// Same as [`begin`](Self::begin).
    pub fn cbegin(&self) -> Cursor<'_, K, V> {
        self.begin()
    }

    /// Same as [`end`](Self::end).
    pub const fn cend(&self) -> Cursor<'_, K, V> {
        self.end()
    }

    /// Returns a value-mutable cursor at the smallest key.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V> {
        let first = self.arena.root.map(|root| self.arena.leftmost_from(root));
        CursorMut::new(&mut self.arena, first)
    }

    /// Returns a cursor at the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the map has no entries.
    pub fn leftmost(&self) -> Result<Cursor<'_, K, V>, TreeError> {
        let root = self.arena.root.ok_or(TreeError::EmptyTree)?;
        Ok(Cursor::new(&self.arena, Some(self.arena.leftmost_from(root))))
    }

    /// Returns a cursor at the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the map has no entries.
    pub fn rightmost(&self) -> Result<Cursor<'_, K, V>, TreeError> {
        let root = self.arena.root.ok_or(TreeError::EmptyTree)?;
        Ok(Cursor::new(&self.arena, Some(self.arena.rightmost_from(root))))
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.leftmost().ok().and_then(|cursor| cursor.key_value())
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.rightmost().ok().and_then(|cursor| cursor.key_value())
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Returns an iterator over entries in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let map: SearchTreeMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    /// let entries: Vec<(&i32, &char)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.begin(), self.len())
    }

    /// Returns an iterator over keys in order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns an iterator over entries in key order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.arena.ordered_ids();
        let mut rank = vec![0; order.iter().max().map_or(0, |largest| largest + 1)];
        for (position, id) in order.iter().enumerate() {
            rank[*id] = position;
        }
        let mut entries: Vec<(NodeId, &K, &mut V)> = self.arena.entries_mut().collect();
        entries.sort_unstable_by_key(|(id, _, _)| rank[*id]);
        IterMut::new(
            entries
                .into_iter()
                .map(|(_, key, value)| (key, value))
                .collect(),
        )
    }

    /// Returns an iterator over mutable values in key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }
}

impl<K, V, C: Comparator<K>> SearchTreeMap<K, V, C> {
    // =========================================================================
    // Lookup
    // =========================================================================

    /// Descends from the root comparing `key` against each node.
    fn locate(&self, key: &K) -> Option<NodeId> {
        let mut current = self.arena.root;
        while let Some(id) = current {
            let node = self.arena.node(id);
            if self.comparator.less(&node.key, key) {
                current = node.right;
            } else if self.comparator.less(key, &node.key) {
                current = node.left;
            } else {
                return Some(id);
            }
        }
        None
    }

    /// Returns a cursor at `key`, or the end cursor if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let map: SearchTreeMap<i32, &str> = [(1, "one")].into_iter().collect();
    /// assert_eq!(map.find(&1).value(), Some(&"one"));
    /// assert_eq!(map.find(&50), map.end());
    /// ```
    pub fn find(&self, key: &K) -> Cursor<'_, K, V> {
        Cursor::new(&self.arena, self.locate(key))
    }

    /// Returns a value-mutable cursor at `key`, or at the end if absent.
    pub fn find_mut(&mut self, key: &K) -> CursorMut<'_, K, V> {
        let position = self.locate(key);
        CursorMut::new(&mut self.arena, position)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).value()
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find_mut(key).into_value_mut()
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    pub fn try_get(&self, key: &K) -> Result<&V, TreeError> {
        self.get(key).ok_or(TreeError::KeyNotFound)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Links a new node unless an equal key exists. Returns the node holding
    /// the key and whether it was created.
    fn insert_node(&mut self, key: K, value: V) -> (NodeId, bool) {
        let Some(root) = self.arena.root else {
            let id = self.arena.allocate(Node::new(key, value));
            self.arena.attach(Slot::Root, Some(id));
            return (id, true);
        };
        if let Some(existing) = self.locate(&key) {
            return (existing, false);
        }

        let mut current = root;
        let slot = loop {
            let node = self.arena.node(current);
            let side = if self.comparator.less(&node.key, &key) {
                Side::Right
            } else {
                Side::Left
            };
            match node.child(side) {
                Some(next) => current = next,
                None => break Slot::Child(current, side),
            }
        };
        let id = self.arena.allocate(Node::new(key, value));
        self.arena.attach(slot, Some(id));
        (id, true)
    }

    /// Inserts `pair` unless its key is already present.
    ///
    /// Returns a cursor at the entry holding the key, and `true` if a new
    /// entry was created. An existing value is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let mut map = SearchTreeMap::new();
    /// map.insert((8, 'x'));
    /// let (cursor, inserted) = map.insert((8, 'y'));
    /// assert!(!inserted);
    /// assert_eq!(cursor.value(), Some(&'x'));
    /// ```
    pub fn insert(&mut self, pair: (K, V)) -> (CursorMut<'_, K, V>, bool) {
        let (key, value) = pair;
        let (id, inserted) = self.insert_node(key, value);
        (CursorMut::new(&mut self.arena, Some(id)), inserted)
    }

    /// Builds the pair from `key` and `value` and inserts it, with the same
    /// contract as [`insert`](Self::insert).
    pub fn emplace(&mut self, key: K, value: V) -> (CursorMut<'_, K, V>, bool) {
        self.insert((key, value))
    }

    /// Returns the value stored under `key`, inserting `V::default()` first
    /// if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let mut counts: SearchTreeMap<&str, u32> = SearchTreeMap::new();
    /// *counts.get_or_insert_default("word") += 1;
    /// *counts.get_or_insert_default("word") += 1;
    /// assert_eq!(counts.get(&"word"), Some(&2));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let id = match self.locate(&key) {
            Some(id) => id,
            None => self.insert_node(key, V::default()).0,
        };
        &mut self.arena.node_mut(id).value
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Removes `key` from the map.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent; the map is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::error::TreeError;
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let mut map: SearchTreeMap<i32, ()> = [(1, ()), (2, ())].into_iter().collect();
    /// assert_eq!(map.erase(&1), Ok(()));
    /// assert_eq!(map.erase(&1), Err(TreeError::KeyNotFound));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn erase(&mut self, key: &K) -> Result<(), TreeError> {
        self.remove_entry(key).map(|_| ())
    }

    /// Removes `key` from the map and returns the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, V), TreeError> {
        let Some(target) = self.locate(key) else {
            log::debug!("erase of an absent key; {} entries unchanged", self.len());
            return Err(TreeError::KeyNotFound);
        };
        Ok(self.unlink(target))
    }

    /// Detaches `target` from the tree and returns the entry it held.
    fn unlink(&mut self, target: NodeId) -> (K, V) {
        let node = self.arena.node(target);
        match (node.left, node.right) {
            (None, None) => {
                let slot = self.arena.slot_of(target);
                self.arena.attach(slot, None);
                log::trace!("erased leaf {target}");
                let released = self.arena.release(target);
                (released.key, released.value)
            }
            (Some(child), None) | (None, Some(child)) => {
                let slot = self.arena.slot_of(target);
                self.arena.attach(slot, Some(child));
                log::trace!("erased {target}, spliced its only child {child}");
                let released = self.arena.release(target);
                (released.key, released.value)
            }
            (Some(_), Some(right)) => {
                let successor = self.arena.leftmost_from(right);
                let orphan = self.arena.node(successor).right;
                if successor == right {
                    self.arena.attach(Slot::Child(target, Side::Right), orphan);
                } else {
                    let slot = self.arena.slot_of(successor);
                    let Slot::Child(_, Side::Left) = slot else {
                        structural_violation("in-order successor is not a left child");
                    };
                    self.arena.attach(slot, orphan);
                }
                log::trace!("erased {target}, replaced by successor {successor}");
                let released = self.arena.release(successor);
                let target_node = self.arena.node_mut(target);
                let key = mem::replace(&mut target_node.key, released.key);
                let value = mem::replace(&mut target_node.value, released.value);
                (key, value)
            }
        }
    }

    // =========================================================================
    // Invariant Checking
    // =========================================================================

    /// Verifies the ordering invariant and the parent/child linkage of every
    /// node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StructuralViolation`] describing the first breach
    /// found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let mut map: SearchTreeMap<i32, i32> = (0..32).map(|key| (key * 7 % 32, key)).collect();
    /// map.erase(&5).unwrap();
    /// assert_eq!(map.check_invariants(), Ok(()));
    /// ```
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        type Frame<'a, K> = (NodeId, Option<NodeId>, Option<&'a K>, Option<&'a K>);

        let violation = |reason| Err(TreeError::StructuralViolation { reason });
        let mut visited = 0;
        let mut stack: SmallVec<[Frame<'_, K>; WALK_STACK_INLINE]> = SmallVec::new();
        stack.extend(self.arena.root.map(|root| (root, None, None, None)));

        while let Some((id, expected_parent, lower, upper)) = stack.pop() {
            visited += 1;
            if visited > self.len() {
                return violation("cycle or shared node");
            }
            let node = self.arena.node(id);
            if node.parent != expected_parent {
                return violation("parent back-reference disagrees with owning edge");
            }
            if lower.is_some_and(|lower| !self.comparator.less(lower, &node.key)) {
                return violation("key does not follow its lower bound");
            }
            if upper.is_some_and(|upper| !self.comparator.less(&node.key, upper)) {
                return violation("key does not precede its upper bound");
            }
            stack.extend(node.left.map(|left| (left, Some(id), lower, Some(&node.key))));
            stack.extend(node.right.map(|right| (right, Some(id), Some(&node.key), upper)));
        }

        if visited == self.len() {
            Ok(())
        } else {
            violation("unreachable node in arena")
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Default> Default for SearchTreeMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

/// Deep copy: the clone owns a fresh node for every source node and shares
/// nothing with the source.
impl<K: Clone, V: Clone, C: Clone> Clone for SearchTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.deep_copy(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for SearchTreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

/// Keys already present keep their value, as with [`SearchTreeMap::insert`].
impl<K, V, C: Comparator<K>> Extend<(K, V)> for SearchTreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_node(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for SearchTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order = self.arena.ordered_ids();
        let entries: Vec<(K, V)> = order
            .into_iter()
            .map(|id| {
                let node = self.arena.release(id);
                (node.key, node.value)
            })
            .collect();
        IntoIter::new(entries)
    }
}

impl<'a, K, V, C> IntoIterator for &'a SearchTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut SearchTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Panics with [`TreeError::KeyNotFound`] if the key is absent. Use
/// [`SearchTreeMap::get_or_insert_default`] for insert-on-miss access.
impl<K, V, C: Comparator<K>> Index<&K> for SearchTreeMap<K, V, C> {
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", TreeError::KeyNotFound),
        }
    }
}

/// Two maps are equal when they hold the same entries in the same order,
/// whatever their shapes.
impl<K: PartialEq, V: PartialEq, C> PartialEq for SearchTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for SearchTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SearchTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for SearchTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(SearchTreeMap<i32, String>: Send, Sync, Clone, Default);
