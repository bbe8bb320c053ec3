//! The main map implementation.
//!
//! This module contains the `IntMap` type, the public face of the trie.

use std::fmt;
use std::iter::FromIterator;
use std::sync::Arc;

use crate::iter::{Iter, Keys, Values};
use crate::merge::{union, union_with};
use crate::node::{Leaf, Node};
use crate::Error;

/// An immutable map from `u64` keys to values, with fast merging.
///
/// The map is a big-endian Patricia trie (Okasaki and Gill, "Fast Mergeable
/// Integer Maps"). Every operation that would modify the map returns a new
/// map instead, sharing all untouched subtrees with the original via `Arc`,
/// so old versions stay valid and cheap to keep around.
///
/// Merging two maps of sizes m and n costs O(m + n); lookups, inserts and
/// removals cost O(min(n, 64)).
pub struct IntMap<V> {
    /// The root node of the trie
    pub(crate) root: Node<V>,
}

impl<V> Clone for IntMap<V> {
    fn clone(&self) -> Self {
        IntMap {
            root: self.root.clone(),
        }
    }
}

impl<V> IntMap<V> {
    /// Creates a new, empty map. This does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use intmap_immutable::IntMap;
    ///
    /// let map = IntMap::<&str>::new();
    /// assert!(map.is_empty());
    /// ```
    pub const fn new() -> Self {
        IntMap { root: Node::Empty }
    }

    /// Returns the number of entries in the map.
    ///
    /// Complexity: O(1)
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Retrieves a reference to the value stored for `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use intmap_immutable::IntMap;
    ///
    /// let map = IntMap::new().insert(5, "a");
    ///
    /// assert_eq!(map.get(5), Some(&"a"));
    /// assert_eq!(map.get(7), None);
    /// ```
    pub fn get(&self, key: u64) -> Option<&V> {
        self.root.get(key).map(|leaf| &leaf.value)
    }

    /// Returns `true` if the map contains a value for `key`.
    pub fn contains_key(&self, key: u64) -> bool {
        self.root.get(key).is_some()
    }

    /// Inserts a key-value pair, returning a new map.
    ///
    /// If the key already exists its value is replaced. `self` is left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use intmap_immutable::IntMap;
    ///
    /// let map1 = IntMap::new().insert(1, 10);
    /// let map2 = map1.insert(1, 20);
    ///
    /// assert_eq!(map1.get(1), Some(&10));
    /// assert_eq!(map2.get(1), Some(&20));
    /// ```
    pub fn insert(&self, key: u64, value: V) -> Self {
        IntMap {
            root: self.root.insert(key, value),
        }
    }

    /// Removes `key`, returning a new map.
    ///
    /// Removing an absent key returns a map sharing the whole trie with `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use intmap_immutable::IntMap;
    ///
    /// let map1 = IntMap::new().insert(1, "one").insert(2, "two");
    /// let map2 = map1.remove(1);
    ///
    /// assert_eq!(map2.get(1), None);
    /// assert_eq!(map2.len(), 1);
    /// assert_eq!(map1.len(), 2);
    /// ```
    pub fn remove(&self, key: u64) -> Self {
        let (root, _) = self.root.remove(key);
        IntMap { root }
    }

    /// Merges two maps, returning their union.
    ///
    /// On a key present in both, the value from `other` wins. For a chain of
    /// merges the rightmost map wins, so merging is associative.
    ///
    /// Complexity: O(m + n)
    ///
    /// # Examples
    ///
    /// ```
    /// use intmap_immutable::IntMap;
    ///
    /// let a = IntMap::new().insert(1, "c").insert(9, "b");
    /// let b = IntMap::new().insert(9, "z");
    ///
    /// let merged = a.merge(&b);
    /// assert_eq!(merged.get(9), Some(&"z"));
    /// assert_eq!(merged.get(1), Some(&"c"));
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        IntMap {
            root: union(&self.root, &other.root),
        }
    }

    /// Merges two maps, combining the values of keys present in both.
    ///
    /// `f` is called as `f(key, value_in_self, value_in_other)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use intmap_immutable::IntMap;
    ///
    /// let a = IntMap::new().insert(1, 10).insert(2, 20);
    /// let b = IntMap::new().insert(2, 5);
    ///
    /// let merged = a.merge_with(&b, |_, x, y| x + y);
    /// assert_eq!(merged.get(2), Some(&25));
    /// ```
    pub fn merge_with<F>(&self, other: &Self, mut f: F) -> Self
    where
        F: FnMut(u64, &V, &V) -> V,
    {
        let mut resolve = |l: &Arc<Leaf<V>>, r: &Arc<Leaf<V>>| {
            Arc::new(Leaf {
                key: l.key,
                value: f(l.key, &l.value, &r.value),
            })
        };

        IntMap {
            root: union_with(&self.root, &other.root, &mut resolve),
        }
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(u64, &V)> {
        self.root.first().map(|leaf| (leaf.key, &leaf.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(u64, &V)> {
        self.root.last().map(|leaf| (leaf.key, &leaf.value))
    }

    /// Returns an iterator over the entries, in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root)
    }

    /// Returns an iterator over the keys, in ascending order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys(self.iter())
    }

    /// Returns an iterator over the values, in ascending key order.
    pub fn values(&self) -> Values<'_, V> {
        Values(self.iter())
    }

    /// Returns `true` if both maps share the same root, which implies they
    /// are equal.
    ///
    /// Complexity: O(1)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.root.ptr_eq(&other.root)
    }

    /// Verifies the structural invariants of the underlying trie.
    ///
    /// The public operations maintain these invariants, so an `Err` here
    /// means a bug in this crate.
    pub fn check_invariants(&self) -> Result<(), Error> {
        self.root.check()
    }
}

impl<V> Default for IntMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for IntMap<V> {
    fn eq(&self, other: &Self) -> bool {
        // Fast path: same root
        if self.ptr_eq(other) {
            return true;
        }

        if self.len() != other.len() {
            return false;
        }

        // The trie shape is determined by the key set, so walking both in
        // order compares contents exactly.
        self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for IntMap<V> {}

impl<V: fmt::Debug> fmt::Debug for IntMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> FromIterator<(u64, V)> for IntMap<V> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (u64, V)>,
    {
        let mut map = IntMap::new();
        map.extend(iter);
        map
    }
}

impl<V> Extend<(u64, V)> for IntMap<V> {
    /// Inserts every entry, replacing this handle's root. Other clones of the
    /// map are unaffected.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (u64, V)>,
    {
        for (key, value) in iter {
            self.root = self.root.insert(key, value);
        }
    }
}

impl<'a, V> IntoIterator for &'a IntMap<V> {
    type Item = (u64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn children<V>(map: &IntMap<V>) -> (&Node<V>, &Node<V>) {
        match &map.root {
            Node::Branch(branch) => (&branch.left, &branch.right),
            _ => panic!("expected a branch at the root"),
        }
    }

    #[test]
    fn test_new_map() {
        let map: IntMap<u32> = IntMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.get(0), None);
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_empty_maps_are_identical() {
        let a: IntMap<u32> = IntMap::new();
        let b: IntMap<u32> = IntMap::default();
        assert!(a.ptr_eq(&b));

        // Removing the last key gets back the canonical empty map.
        let c = a.insert(3, 3).remove(3);
        assert!(c.ptr_eq(&a));
    }

    #[test]
    fn test_insert_persistence() {
        let map1 = IntMap::new().insert(5, "a");
        let map2 = map1.insert(9, "b");

        assert_eq!(map1.len(), 1);
        assert_eq!(map2.len(), 2);
        assert_eq!(map1.get(9), None);
        assert_eq!(map2.get(9), Some(&"b"));
    }

    #[test]
    fn test_structural_sharing() {
        let high = 1 << 63;
        let map1: IntMap<u64> = [1, 2, high | 1, high | 2]
            .iter()
            .map(|&k| (k, k))
            .collect();

        // Inserting on the left must not touch the right subtree.
        let map2 = map1.insert(3, 3);
        assert!(!map1.ptr_eq(&map2));
        assert!(children(&map1).1.ptr_eq(children(&map2).1));
        assert!(!children(&map1).0.ptr_eq(children(&map2).0));

        // And removing on the right keeps the left subtree.
        let map3 = map2.remove(high | 1);
        assert!(children(&map2).0.ptr_eq(children(&map3).0));
    }

    #[test]
    fn test_remove_absent_is_shared() {
        let map = IntMap::new().insert(1, 1).insert(2, 2);
        assert!(map.remove(3).ptr_eq(&map));
        assert!(map.remove(1 << 40).ptr_eq(&map));
    }

    #[test]
    fn test_merge_with_keeps_unique_values() {
        let a = IntMap::new().insert(1, 1).insert(2, 2);
        let b = IntMap::new().insert(2, 20).insert(3, 30);

        let merged = a.merge_with(&b, |key, x, y| key as i32 * 100 + x + y);
        assert_eq!(merged.get(1), Some(&1));
        assert_eq!(merged.get(2), Some(&222));
        assert_eq!(merged.get(3), Some(&30));
        assert!(merged.check_invariants().is_ok());
    }

    #[test]
    fn test_merge_with_passes_left_then_right() {
        let concat = |_: u64, l: &String, r: &String| format!("{}{}", l, r);
        let s = |v: &str| v.to_string();

        let leaf = IntMap::new().insert(2, s("L"));
        let branch = IntMap::new().insert(1, s("x")).insert(2, s("R"));

        // Leaf on the left, branch on the right
        let merged = leaf.merge_with(&branch, concat);
        assert_eq!(merged.get(2), Some(&s("LR")));

        // Branch on the left, leaf on the right
        let left = IntMap::new().insert(1, s("x")).insert(2, s("L"));
        let right = IntMap::new().insert(2, s("R"));
        let merged = left.merge_with(&right, concat);
        assert_eq!(merged.get(2), Some(&s("LR")));
        assert_eq!(merged.get(1), Some(&s("x")));

        // Branch on both sides
        let right = IntMap::new().insert(2, s("R")).insert(3, s("y"));
        let merged = left.merge_with(&right, concat);
        assert_eq!(merged.get(2), Some(&s("LR")));
        assert_eq!(merged.len(), 3);
        assert!(merged.check_invariants().is_ok());
    }

    #[test]
    fn test_first_and_last() {
        let map: IntMap<u64> = IntMap::new();
        assert_eq!(map.first_key_value(), None);

        let map = map.insert(10, 1).insert(u64::MAX, 2).insert(3, 3);
        assert_eq!(map.first_key_value(), Some((3, &3)));
        assert_eq!(map.last_key_value(), Some((u64::MAX, &2)));
    }

    #[test]
    fn test_equality() {
        let a: IntMap<u32> = vec![(1, 1), (2, 2), (3, 3)].into_iter().collect();
        let b: IntMap<u32> = vec![(3, 3), (1, 1), (2, 2)].into_iter().collect();
        let c = b.insert(3, 4);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, a.remove(1));
    }

    #[test]
    fn test_extend_leaves_clones_alone() {
        let original = IntMap::new().insert(1, "one");
        let mut extended = original.clone();
        extended.extend(vec![(2, "two"), (3, "three")]);

        assert_eq!(original.len(), 1);
        assert_eq!(extended.len(), 3);
    }

    #[test]
    fn test_debug_format() {
        let map = IntMap::new().insert(2, "b").insert(1, "a");
        assert_eq!(format!("{:?}", map), r#"{1: "a", 2: "b"}"#);
    }
}
