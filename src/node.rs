//! Internal node implementation for the integer trie.
//!
//! A `Node` is a cheap handle: `Empty` holds nothing, `Leaf` and `Branch`
//! hold an `Arc` to an immutable body. Cloning a node never copies a
//! subtree, which is what lets many map versions share structure.

use std::sync::Arc;

use crate::bits::{highest_differing_bit, mask_above, matches_prefix, side_of, Side};
use crate::Error;

/// A node of a big-endian Patricia trie.
#[derive(Debug)]
pub(crate) enum Node<V> {
    /// No keys. Also the canonical empty map; costs no allocation.
    Empty,
    /// Exactly one key-value pair.
    Leaf(Arc<Leaf<V>>),
    /// A binary split on a single bit.
    Branch(Arc<Branch<V>>),
}

#[derive(Debug)]
pub(crate) struct Leaf<V> {
    pub key: u64,
    pub value: V,
}

/// Internal split point.
///
/// Invariants:
///
///   * `bit` is a power of two.
///   * `prefix == mask_above(prefix, bit)`, and every key below agrees with
///     `prefix` above `bit`.
///   * Keys in `left` have `bit` clear, keys in `right` have it set.
///   * Neither child is `Node::Empty`.
///   * A child branch splits on a strictly less significant bit.
///   * `size == left.len() + right.len()`.
#[derive(Debug)]
pub(crate) struct Branch<V> {
    pub prefix: u64,
    pub bit: u64,
    pub size: usize,
    pub left: Node<V>,
    pub right: Node<V>,
}

impl<V> Clone for Node<V> {
    fn clone(&self) -> Self {
        match self {
            Node::Empty => Node::Empty,
            Node::Leaf(leaf) => Node::Leaf(Arc::clone(leaf)),
            Node::Branch(branch) => Node::Branch(Arc::clone(branch)),
        }
    }
}

/// Creates a branch above two subtrees that do not share a branch yet.
///
/// `key0` and `key1` are any keys known to live in `node0` and `node1`
/// respectively (a leaf key or a branch prefix). They must differ above the
/// branching bits of both nodes.
pub(crate) fn join<V>(key0: u64, node0: Node<V>, key1: u64, node1: Node<V>) -> Node<V> {
    let bit = highest_differing_bit(key0, key1);
    let prefix = mask_above(key0, bit);

    match side_of(key0, bit) {
        Side::Left => Node::branch(prefix, bit, node0, node1),
        Side::Right => Node::branch(prefix, bit, node1, node0),
    }
}

impl<V> Node<V> {
    #[cfg(test)]
    pub fn leaf(key: u64, value: V) -> Self {
        Node::Leaf(Arc::new(Leaf { key, value }))
    }

    /// Builds a branch node, caching its size.
    pub fn branch(prefix: u64, bit: u64, left: Node<V>, right: Node<V>) -> Self {
        debug_assert!(bit.is_power_of_two());
        debug_assert_eq!(prefix, mask_above(prefix, bit));
        debug_assert!(!left.is_empty() && !right.is_empty());

        Node::Branch(Arc::new(Branch {
            prefix,
            bit,
            size: left.len() + right.len(),
            left,
            right,
        }))
    }

    /// Number of keys below this node.
    pub fn len(&self) -> usize {
        match self {
            Node::Empty => 0,
            Node::Leaf(_) => 1,
            Node::Branch(branch) => branch.size,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Whether two nodes are the same allocation (or both empty).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Empty, Node::Empty) => true,
            (Node::Leaf(a), Node::Leaf(b)) => Arc::ptr_eq(a, b),
            (Node::Branch(a), Node::Branch(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Looks up the leaf holding `key`.
    pub fn get(&self, key: u64) -> Option<&Leaf<V>> {
        let mut current = self;

        loop {
            match current {
                Node::Empty => return None,
                Node::Leaf(leaf) => {
                    return if leaf.key == key { Some(&**leaf) } else { None };
                }
                Node::Branch(branch) => {
                    if !matches_prefix(key, branch.prefix, branch.bit) {
                        return None;
                    }
                    current = branch.child(side_of(key, branch.bit));
                }
            }
        }
    }

    /// Inserts `incoming`, returning the new subtree.
    ///
    /// On a key collision `resolve(existing, incoming)` picks (or builds) the
    /// leaf that survives. Only the nodes on the path to the key are rebuilt;
    /// everything else is shared with `self`.
    pub fn upsert<F>(&self, incoming: Arc<Leaf<V>>, resolve: &mut F) -> Node<V>
    where
        F: FnMut(&Arc<Leaf<V>>, Arc<Leaf<V>>) -> Arc<Leaf<V>>,
    {
        let key = incoming.key;

        match self {
            Node::Empty => Node::Leaf(incoming),
            Node::Leaf(existing) => {
                if existing.key == key {
                    Node::Leaf(resolve(existing, incoming))
                } else {
                    join(key, Node::Leaf(incoming), existing.key, self.clone())
                }
            }
            Node::Branch(branch) => {
                if !matches_prefix(key, branch.prefix, branch.bit) {
                    // The key lives outside this subtree; hang both under a new branch.
                    return join(key, Node::Leaf(incoming), branch.prefix, self.clone());
                }

                let side = side_of(key, branch.bit);
                let child = branch.child(side).upsert(incoming, resolve);
                branch.replace(side, child)
            }
        }
    }

    /// Inserts a key, overwriting any previous value.
    pub fn insert(&self, key: u64, value: V) -> Node<V> {
        let leaf = Arc::new(Leaf { key, value });
        self.upsert(leaf, &mut |_: &Arc<Leaf<V>>, incoming: Arc<Leaf<V>>| incoming)
    }

    /// Removes `key`, returning the new subtree and whether anything was removed.
    ///
    /// When nothing is removed the returned node is `self`, shared.
    pub fn remove(&self, key: u64) -> (Node<V>, bool) {
        match self {
            Node::Empty => (Node::Empty, false),
            Node::Leaf(leaf) => {
                if leaf.key == key {
                    (Node::Empty, true)
                } else {
                    (self.clone(), false)
                }
            }
            Node::Branch(branch) => {
                if !matches_prefix(key, branch.prefix, branch.bit) {
                    return (self.clone(), false);
                }

                let side = side_of(key, branch.bit);
                let (child, removed) = branch.child(side).remove(key);

                if !removed {
                    return (self.clone(), false);
                }

                if child.is_empty() {
                    // Collapse: a branch never keeps an empty side.
                    (branch.child(side.opposite()).clone(), true)
                } else {
                    (branch.replace(side, child), true)
                }
            }
        }
    }

    /// Leftmost leaf, which holds the smallest key.
    pub fn first(&self) -> Option<&Leaf<V>> {
        let mut current = self;
        loop {
            match current {
                Node::Empty => return None,
                Node::Leaf(leaf) => return Some(&**leaf),
                Node::Branch(branch) => current = &branch.left,
            }
        }
    }

    /// Rightmost leaf, which holds the largest key.
    pub fn last(&self) -> Option<&Leaf<V>> {
        let mut current = self;
        loop {
            match current {
                Node::Empty => return None,
                Node::Leaf(leaf) => return Some(&**leaf),
                Node::Branch(branch) => current = &branch.right,
            }
        }
    }

    /// Walks the subtree and reports the first broken invariant.
    pub fn check(&self) -> Result<(), Error> {
        match self {
            Node::Empty | Node::Leaf(_) => Ok(()),
            Node::Branch(branch) => branch.check(),
        }
    }
}

impl<V> Branch<V> {
    pub fn child(&self, side: Side) -> &Node<V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Rebuilds this branch with one side replaced, sharing the other side.
    pub fn replace(&self, side: Side, child: Node<V>) -> Node<V> {
        match side {
            Side::Left => Node::branch(self.prefix, self.bit, child, self.right.clone()),
            Side::Right => Node::branch(self.prefix, self.bit, self.left.clone(), child),
        }
    }

    fn check(&self) -> Result<(), Error> {
        let (prefix, bit) = (self.prefix, self.bit);

        if !bit.is_power_of_two() {
            return Err(Error::BitNotPowerOfTwo { bit });
        }
        if prefix != mask_above(prefix, bit) {
            return Err(Error::UnmaskedPrefix { prefix, bit });
        }

        let mut actual = 0;
        for side in [Side::Left, Side::Right].iter().copied() {
            let child = self.child(side);
            let key = match child {
                Node::Empty => return Err(Error::EmptyChild { prefix, bit }),
                Node::Leaf(leaf) => leaf.key,
                Node::Branch(inner) => {
                    if inner.bit >= bit {
                        return Err(Error::BitNotDescending {
                            parent: bit,
                            child: inner.bit,
                        });
                    }
                    inner.prefix
                }
            };

            if !matches_prefix(key, prefix, bit) || side_of(key, bit) != side {
                return Err(Error::Misplaced { key, prefix, bit });
            }

            child.check()?;
            actual += child.len();
        }

        if actual != self.size {
            return Err(Error::SizeMismatch {
                prefix,
                cached: self.size,
                actual,
            });
        }

        Ok(())
    }
}
