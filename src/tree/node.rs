//! Node storage and linkage.
//!
//! Nodes live in a [`Slab`] arena and refer to each other by [`NodeId`].
//! The `left`/`right` ids are the owning edges: every live node is named by
//! exactly one child slot or by the root slot. The `parent` id only observes
//! and is kept in step with the owning edges by [`NodeArena::attach`].

use slab::Slab;
use smallvec::SmallVec;

use crate::error::structural_violation;

/// Index of a node inside its arena.
pub(crate) type NodeId = usize;

/// Inline capacity of the explicit stacks used for whole-tree walks.
pub(crate) const WALK_STACK_INLINE: usize = 32;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

/// The place that owns a node: the tree's root slot or a parent's child slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Slot {
    Root,
    Child(NodeId, Side),
}

// =============================================================================
// Node Definition
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Creates a detached node holding `key` and `value`.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    const fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

// =============================================================================
// NodeArena Definition
// =============================================================================

/// Owner of every node of one tree, plus the root slot.
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    nodes: Slab<Node<K, V>>,
    pub(crate) root: Option<NodeId>,
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes
            .get(id)
            .unwrap_or_else(|| structural_violation("link to a released node"))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| structural_violation("link to a released node"))
    }

    /// Places a new, still unlinked node in the arena.
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        self.nodes.insert(node)
    }

    /// Removes a node from the arena. The caller must already have unlinked
    /// it from its owning slot.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        self.nodes
            .try_remove(id)
            .unwrap_or_else(|| structural_violation("released a node twice"))
    }

    /// Drops every node at once.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the slot that currently owns `id`, checked against the
    /// parent's child ids.
    pub(crate) fn slot_of(&self, id: NodeId) -> Slot {
        match self.node(id).parent {
            None if self.root == Some(id) => Slot::Root,
            None => structural_violation("parentless node is not the root"),
            Some(parent) => {
                let parent_node = self.node(parent);
                if parent_node.left == Some(id) {
                    Slot::Child(parent, Side::Left)
                } else if parent_node.right == Some(id) {
                    Slot::Child(parent, Side::Right)
                } else {
                    structural_violation("parent does not own its child")
                }
            }
        }
    }

    /// Makes `child` the occupant of `slot`.
    ///
    /// The owning edge and the child's parent back-reference are updated
    /// together. Whatever occupied the slot before is no longer reachable
    /// through it.
    pub(crate) fn attach(&mut self, slot: Slot, child: Option<NodeId>) {
        let parent = match slot {
            Slot::Root => {
                self.root = child;
                None
            }
            Slot::Child(parent, side) => {
                *self.node_mut(parent).child_mut(side) = child;
                Some(parent)
            }
        };
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }
        log::trace!("attached {child:?} at {slot:?}");
    }

    /// Walks all-left from `id` and returns the last node reached.
    pub(crate) fn leftmost_from(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    /// Walks all-right from `id` and returns the last node reached.
    pub(crate) fn rightmost_from(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// Returns the in-order successor of `id`, or `None` past the largest key.
    ///
    /// With a right subtree the successor is that subtree's leftmost node.
    /// Otherwise climb while arriving from a right child; the first parent
    /// reached from its left child is the successor.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        if let Some(right) = node.right {
            return Some(self.leftmost_from(right));
        }
        let mut child = id;
        let mut parent = node.parent;
        while let Some(current) = parent {
            let current_node = self.node(current);
            if current_node.left == Some(child) {
                return Some(current);
            }
            child = current;
            parent = current_node.parent;
        }
        None
    }

    /// Node ids in key order.
    pub(crate) fn ordered_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.len());
        let mut current = self.root.map(|root| self.leftmost_from(root));
        while let Some(id) = current {
            ids.push(id);
            current = self.successor(id);
        }
        ids
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut stack: SmallVec<[(NodeId, usize); WALK_STACK_INLINE]> = SmallVec::new();
        stack.extend(self.root.map(|root| (root, 1)));
        let mut height = 0;
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(id);
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Iterates `(id, &key, &mut value)` over live nodes in arena order.
    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (NodeId, &K, &mut V)> {
        self.nodes
            .iter_mut()
            .map(|(id, node)| (id, &node.key, &mut node.value))
    }
}

impl<K: Clone, V: Clone> NodeArena<K, V> {
    /// Builds a structurally identical, fully independent copy.
    ///
    /// Each copied node gets the copy of its source parent as its parent;
    /// the right subtree is copied before the left one. Ids in the copy are
    /// compact and do not match the source's.
    pub(crate) fn deep_copy(&self) -> Self {
        let mut copy = Self::with_capacity(self.len());
        let mut pending: SmallVec<[(NodeId, Slot); WALK_STACK_INLINE]> = SmallVec::new();
        pending.extend(self.root.map(|root| (root, Slot::Root)));
        while let Some((source_id, slot)) = pending.pop() {
            let source = self.node(source_id);
            let id = copy.allocate(Node::new(source.key.clone(), source.value.clone()));
            copy.attach(slot, Some(id));
            // Popped in reverse: the right subtree is copied first.
            pending.extend(source.left.map(|left| (left, Slot::Child(id, Side::Left))));
            pending.extend(source.right.map(|right| (right, Slot::Child(id, Side::Right))));
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// 2 at the root, 1 on the left, 3 on the right.
    fn three_node_arena() -> NodeArena<i32, char> {
        let mut arena = NodeArena::new();
        let root = arena.allocate(Node::new(2, 'b'));
        arena.attach(Slot::Root, Some(root));
        let left = arena.allocate(Node::new(1, 'a'));
        arena.attach(Slot::Child(root, Side::Left), Some(left));
        let right = arena.allocate(Node::new(3, 'c'));
        arena.attach(Slot::Child(root, Side::Right), Some(right));
        arena
    }

    #[rstest]
    fn test_attach_sets_owning_edge_and_back_reference() {
        let arena = three_node_arena();
        let root = arena.root.unwrap();
        let left = arena.node(root).left.unwrap();
        assert_eq!(arena.node(left).parent, Some(root));
        assert_eq!(arena.node(root).parent, None);
    }

    #[rstest]
    fn test_slot_of_reports_owner() {
        let arena = three_node_arena();
        let root = arena.root.unwrap();
        let right = arena.node(root).right.unwrap();
        assert_eq!(arena.slot_of(root), Slot::Root);
        assert_eq!(arena.slot_of(right), Slot::Child(root, Side::Right));
    }

    #[rstest]
    fn test_successor_walks_in_key_order() {
        let arena = three_node_arena();
        let keys: Vec<i32> = arena
            .ordered_ids()
            .into_iter()
            .map(|id| arena.node(id).key)
            .collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_successor_of_largest_is_none() {
        let arena = three_node_arena();
        let largest = arena.rightmost_from(arena.root.unwrap());
        assert_eq!(arena.successor(largest), None);
    }

    #[rstest]
    fn test_height_counts_nodes_on_longest_path() {
        assert_eq!(NodeArena::<i32, i32>::new().height(), 0);
        assert_eq!(three_node_arena().height(), 2);
    }

    #[rstest]
    fn test_deep_copy_rewires_parents() {
        let arena = three_node_arena();
        let copy = arena.deep_copy();
        let root = copy.root.unwrap();
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.node(root).key, 2);
        for side in [Side::Left, Side::Right] {
            let child = copy.node(root).child(side).unwrap();
            assert_eq!(copy.node(child).parent, Some(root));
        }
    }

    #[rstest]
    #[should_panic(expected = "released a node twice")]
    fn test_double_release_is_fatal() {
        let mut arena = three_node_arena();
        let root = arena.root.unwrap();
        let left = arena.node(root).left.unwrap();
        arena.attach(Slot::Child(root, Side::Left), None);
        arena.release(left);
        arena.release(left);
    }
}
