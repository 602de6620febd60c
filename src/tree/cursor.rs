//! Cursors: positions inside a [`SearchTreeMap`](super::SearchTreeMap).
//!
//! A cursor points either at a node or at the end position, one past the
//! largest key. Stepping forward uses the parent back-references, so no
//! traversal stack is kept. Cursors borrow the map; any structural change
//! (`insert`, `erase`, `balance`, `clear`) needs `&mut` access and therefore
//! ends every outstanding cursor first.

use std::fmt;
use std::ptr;

use super::node::{NodeArena, NodeId};

// =============================================================================
// Cursor
// =============================================================================

/// A read-only position in a [`SearchTreeMap`](super::SearchTreeMap).
///
/// Two cursors are equal when they are over the same map and point at the
/// same node, or are both at the end.
///
/// # Examples
///
/// ```rust
/// use bstmap::tree::SearchTreeMap;
///
/// let map: SearchTreeMap<i32, &str> = [(2, "two"), (1, "one"), (3, "three")]
///     .into_iter()
///     .collect();
///
/// let mut cursor = map.begin();
/// assert_eq!(cursor.key(), Some(&1));
/// cursor.move_next();
/// assert_eq!(cursor.value(), Some(&"two"));
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor, map.end());
/// ```
pub struct Cursor<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    current: Option<NodeId>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) const fn new(arena: &'a NodeArena<K, V>, current: Option<NodeId>) -> Self {
        Self { arena, current }
    }

    /// Returns `true` at the end position.
    #[inline]
    pub const fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The key at this position, `None` at the end.
    pub fn key(&self) -> Option<&'a K> {
        let arena = self.arena;
        self.current.map(|id| &arena.node(id).key)
    }

    /// The value at this position, `None` at the end.
    pub fn value(&self) -> Option<&'a V> {
        let arena = self.arena;
        self.current.map(|id| &arena.node(id).value)
    }

    /// The key and value at this position, `None` at the end.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let arena = self.arena;
        self.current.map(|id| {
            let node = arena.node(id);
            (&node.key, &node.value)
        })
    }

    /// Advances to the next key in order. At the end this does nothing.
    pub fn move_next(&mut self) {
        self.current = self.current.and_then(|id| self.arena.successor(id));
    }

    /// Advances like [`move_next`](Self::move_next) and returns the position
    /// held before the step.
    #[must_use = "use `move_next` when the previous position is not needed"]
    pub fn next_position(&mut self) -> Self {
        let previous = *self;
        self.move_next();
        previous
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena) && self.current == other.current
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("entry", &self.key_value())
            .finish()
    }
}

static_assertions::assert_impl_all!(Cursor<'static, i32, String>: Copy, Eq);

// =============================================================================
// CursorMut
// =============================================================================

/// A position in a [`SearchTreeMap`](super::SearchTreeMap) that may modify
/// the value it points at.
///
/// Keys stay read-only: changing one in place could break the ordering.
///
/// # Examples
///
/// ```rust
/// use bstmap::tree::SearchTreeMap;
///
/// let mut map = SearchTreeMap::new();
/// let (mut cursor, inserted) = map.emplace("apples", 3);
/// assert!(inserted);
/// if let Some(count) = cursor.value_mut() {
///     *count += 1;
/// }
/// assert_eq!(map.get(&"apples"), Some(&4));
/// ```
pub struct CursorMut<'a, K, V> {
    arena: &'a mut NodeArena<K, V>,
    current: Option<NodeId>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) const fn new(arena: &'a mut NodeArena<K, V>, current: Option<NodeId>) -> Self {
        Self { arena, current }
    }

    /// Returns `true` at the end position.
    #[inline]
    pub const fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The key at this position, `None` at the end.
    pub fn key(&self) -> Option<&K> {
        let id = self.current?;
        Some(&self.arena.node(id).key)
    }

    /// The value at this position, `None` at the end.
    pub fn value(&self) -> Option<&V> {
        let id = self.current?;
        Some(&self.arena.node(id).value)
    }

    /// A mutable reference to the value at this position, `None` at the end.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        let id = self.current?;
        Some(&mut self.arena.node_mut(id).value)
    }

    /// Converts the cursor into a mutable reference to its value that lives
    /// as long as the map borrow.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        let id = self.current?;
        Some(&mut self.arena.node_mut(id).value)
    }

    /// Advances to the next key in order. At the end this does nothing.
    pub fn move_next(&mut self) {
        self.current = self.current.and_then(|id| self.arena.successor(id));
    }

    /// A read-only view of the same position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(&*self.arena, self.current)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CursorMut")
            .field("entry", &self.as_cursor().key_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::SearchTreeMap;
    use rstest::rstest;

    fn sample_map() -> SearchTreeMap<i32, i32> {
        [8, 3, 1, 6, 4, 7, 10, 13, 14]
            .into_iter()
            .map(|key| (key, key * 10))
            .collect()
    }

    #[rstest]
    fn test_move_next_visits_keys_in_order() {
        let map = sample_map();
        let mut cursor = map.begin();
        let mut keys = Vec::new();
        while let Some(key) = cursor.key() {
            keys.push(*key);
            cursor.move_next();
        }
        assert_eq!(keys, vec![1, 3, 4, 6, 7, 8, 10, 13, 14]);
    }

    #[rstest]
    fn test_move_next_at_end_stays_at_end() {
        let map = sample_map();
        let mut cursor = map.end();
        cursor.move_next();
        assert!(cursor.is_end());
        assert_eq!(cursor.key(), None);
        assert_eq!(cursor.value(), None);
    }

    #[rstest]
    fn test_next_position_returns_previous() {
        let map = sample_map();
        let mut cursor = map.begin();
        let previous = cursor.next_position();
        assert_eq!(previous.key(), Some(&1));
        assert_eq!(cursor.key(), Some(&3));
    }

    #[rstest]
    fn test_cursor_equality_is_node_identity() {
        let map = sample_map();
        let mut stepped = map.begin();
        stepped.move_next();
        assert_eq!(stepped, map.find(&3));
        assert_ne!(stepped, map.find(&4));
    }

    #[rstest]
    fn test_cursors_over_different_maps_differ() {
        let first = sample_map();
        let second = first.clone();
        assert_ne!(first.find(&8), second.find(&8));
        assert_eq!(first.end(), first.cend());
        assert_ne!(first.end(), second.end());
    }

    #[rstest]
    fn test_cursor_mut_updates_value() {
        let mut map = sample_map();
        let mut cursor = map.find_mut(&6);
        *cursor.value_mut().unwrap() = -6;
        cursor.move_next();
        assert_eq!(cursor.key(), Some(&7));
        assert_eq!(map.get(&6), Some(&-6));
    }

    #[rstest]
    fn test_cursor_debug_shows_entry() {
        let map = sample_map();
        assert_eq!(format!("{:?}", map.find(&4)), "Cursor { entry: Some((4, 40)) }");
        assert_eq!(format!("{:?}", map.end()), "Cursor { entry: None }");
    }
}
