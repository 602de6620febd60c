//! On-demand rebuild of a [`SearchTreeMap`] into a minimum-height tree.
//!
//! The map never rebalances while inserting or erasing. `balance` snapshots
//! every entry in key order, empties the arena and rebuilds by always
//! rooting a range at its midpoint.

use super::map::SearchTreeMap;
use super::node::{Node, NodeArena, NodeId};

impl<K, V, C> SearchTreeMap<K, V, C> {
    /// Rebuilds the tree so its height is ⌈log₂(n + 1)⌉ for `n` entries.
    ///
    /// Entries, their order and the map's length are unchanged. Only the
    /// shape differs afterwards.
    ///
    /// # Complexity
    ///
    /// O(N) time, O(N) temporary space.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::SearchTreeMap;
    ///
    /// let mut map: SearchTreeMap<i32, char> = SearchTreeMap::new();
    /// for (key, value) in (1..=7).zip('a'..) {
    ///     map.emplace(key, value);
    /// }
    /// assert_eq!(map.height(), 7);
    ///
    /// map.balance();
    /// assert_eq!(map.height(), 3);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
    /// ```
    pub fn balance(&mut self) {
        let arena = self.arena_mut();
        let height_before = arena.height();
        let order = arena.ordered_ids();
        let mut entries: Vec<Option<(K, V)>> = order
            .into_iter()
            .map(|id| {
                let node = arena.release(id);
                Some((node.key, node.value))
            })
            .collect();
        arena.clear();

        let root = build_balanced(arena, &mut entries, None);
        arena.root = root;
        log::debug!(
            "balanced {} entries, height {height_before} -> {}",
            arena.len(),
            arena.height()
        );
    }
}

/// Builds the subtree for `entries`, a contiguous sorted range, and returns
/// its root. The midpoint becomes the root and is passed down as the parent
/// of both halves.
fn build_balanced<K, V>(
    arena: &mut NodeArena<K, V>,
    entries: &mut [Option<(K, V)>],
    parent: Option<NodeId>,
) -> Option<NodeId> {
    if entries.is_empty() {
        return None;
    }
    let median = (entries.len() - 1) / 2;
    let (lower, rest) = entries.split_at_mut(median);
    let (middle, upper) = rest.split_first_mut()?;
    let (key, value) = middle.take()?;

    let mut node = Node::new(key, value);
    node.parent = parent;
    let id = arena.allocate(node);
    let left = build_balanced(arena, lower, Some(id));
    let right = build_balanced(arena, upper, Some(id));
    let built = arena.node_mut(id);
    built.left = left;
    built.right = right;
    Some(id)
}
