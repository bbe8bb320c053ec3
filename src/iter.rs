//! Iterators over an `IntMap`.
//!
//! Leaves are visited depth-first, left before right. Because the trie is
//! big-endian, that is ascending order of the keys as unsigned integers.

use std::iter::FusedIterator;

use crate::node::Node;

/// An iterator over the entries of an `IntMap`, in ascending key order.
pub struct Iter<'a, V> {
    /// Subtrees not visited yet; the back of the stack is visited first.
    stack: Vec<&'a Node<V>>,

    /// Entries left to yield.
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(root: &'a Node<V>) -> Self {
        let mut stack = Vec::new();
        if !root.is_empty() {
            stack.push(root);
        }

        Iter {
            stack,
            remaining: root.len(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut current = self.stack.pop()?;

        // Descend to the leftmost leaf, remembering the right sides.
        loop {
            match current {
                Node::Branch(branch) => {
                    self.stack.push(&branch.right);
                    current = &branch.left;
                }
                Node::Leaf(leaf) => {
                    self.remaining -= 1;
                    return Some((leaf.key, &leaf.value));
                }
                // Branches never hold an empty child and an empty root is
                // never pushed.
                Node::Empty => unreachable!("empty node inside a trie"),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

impl<'a, V> FusedIterator for Iter<'a, V> {}

impl<'a, V> Clone for Iter<'a, V> {
    fn clone(&self) -> Self {
        Iter {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// An iterator over the keys of an `IntMap`, in ascending order.
#[derive(Clone)]
pub struct Keys<'a, V>(pub(crate) Iter<'a, V>);

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, V> ExactSizeIterator for Keys<'a, V> {}

/// An iterator over the values of an `IntMap`, in ascending key order.
#[derive(Clone)]
pub struct Values<'a, V>(pub(crate) Iter<'a, V>);

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, V> ExactSizeIterator for Values<'a, V> {}
