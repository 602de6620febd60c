//! Ordering strategies for [`SearchTreeMap`](super::SearchTreeMap).
//!
//! A comparator is a strict "orders before" predicate. Two keys are
//! considered equal when neither orders before the other.

/// A strict total order over keys, injected into a tree at construction.
///
/// Any `Fn(&K, &K) -> bool` closure is a comparator, so custom orders do not
/// need a named type.
///
/// # Examples
///
/// ```rust
/// use bstmap::tree::{Comparator, NaturalOrder, SearchTreeMap};
///
/// assert!(NaturalOrder.less(&1, &2));
/// assert!(NaturalOrder.equivalent(&3, &3));
///
/// let mut descending = SearchTreeMap::with_comparator(|left: &i32, right: &i32| left > right);
/// descending.emplace(1, ());
/// descending.emplace(3, ());
/// descending.emplace(2, ());
/// let keys: Vec<i32> = descending.keys().copied().collect();
/// assert_eq!(keys, vec![3, 2, 1]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `left` orders strictly before `right`.
    fn less(&self, left: &K, right: &K) -> bool;

    /// Returns `true` if neither key orders before the other.
    fn equivalent(&self, left: &K, right: &K) -> bool {
        !self.less(left, right) && !self.less(right, left)
    }
}

/// The order given by the key's [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left < right
    }
}

/// The reverse of the key's [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        right < left
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        self(left, right)
    }
}
