//! Union of two tries.
//!
//! Branches are compared by prefix and branching bit; whenever one trie's
//! prefix does not fall inside the other's, the two are joined under a new
//! branch without looking inside either. That is what makes merging two
//! maps of sizes m and n cost O(m + n) instead of O(n log m).

use std::sync::Arc;

use crate::bits::{matches_prefix, side_of, Side};
use crate::node::{join, Leaf, Node};

/// Merges `left` and `right`.
///
/// When both contain a key, `resolve(left_leaf, right_leaf)` decides which
/// leaf ends up in the result. Subtrees found on only one side are shared,
/// never copied.
pub(crate) fn union_with<V, F>(left: &Node<V>, right: &Node<V>, resolve: &mut F) -> Node<V>
where
    F: FnMut(&Arc<Leaf<V>>, &Arc<Leaf<V>>) -> Arc<Leaf<V>>,
{
    merge_nodes(left, right, resolve, false)
}

/// Right-biased union: on a collision the leaf from `right` is kept as is.
///
/// A subtree that is the same allocation on both sides is returned as is.
pub(crate) fn union<V>(left: &Node<V>, right: &Node<V>) -> Node<V> {
    let mut keep_right = |_: &Arc<Leaf<V>>, r: &Arc<Leaf<V>>| Arc::clone(r);
    merge_nodes(left, right, &mut keep_right, true)
}

/// `share_identical` may only be set when `resolve` returns one of its
/// arguments unchanged for identical leaves.
fn merge_nodes<V, F>(
    left: &Node<V>,
    right: &Node<V>,
    resolve: &mut F,
    share_identical: bool,
) -> Node<V>
where
    F: FnMut(&Arc<Leaf<V>>, &Arc<Leaf<V>>) -> Arc<Leaf<V>>,
{
    if share_identical && left.ptr_eq(right) {
        return right.clone();
    }

    match (left, right) {
        (Node::Empty, _) => right.clone(),
        (_, Node::Empty) => left.clone(),
        (_, Node::Leaf(leaf)) => left.upsert(
            Arc::clone(leaf),
            &mut |existing: &Arc<Leaf<V>>, incoming: Arc<Leaf<V>>| resolve(existing, &incoming),
        ),
        (Node::Leaf(leaf), _) => right.upsert(
            Arc::clone(leaf),
            &mut |existing: &Arc<Leaf<V>>, incoming: Arc<Leaf<V>>| resolve(&incoming, existing),
        ),
        (Node::Branch(a), Node::Branch(b)) => {
            if a.bit == b.bit && a.prefix == b.prefix {
                // Same split point: merge the halves pairwise.
                let l = merge_nodes(&a.left, &b.left, resolve, share_identical);
                let r = merge_nodes(&a.right, &b.right, resolve, share_identical);
                Node::branch(a.prefix, a.bit, l, r)
            } else if a.bit > b.bit && matches_prefix(b.prefix, a.prefix, a.bit) {
                // `b` fits entirely under one side of `a`.
                let side = side_of(b.prefix, a.bit);
                let child = match side {
                    Side::Left => merge_nodes(&a.left, right, resolve, share_identical),
                    Side::Right => merge_nodes(&a.right, right, resolve, share_identical),
                };
                a.replace(side, child)
            } else if b.bit > a.bit && matches_prefix(a.prefix, b.prefix, b.bit) {
                let side = side_of(a.prefix, b.bit);
                let child = match side {
                    Side::Left => merge_nodes(left, &b.left, resolve, share_identical),
                    Side::Right => merge_nodes(left, &b.right, resolve, share_identical),
                };
                b.replace(side, child)
            } else {
                // Disjoint prefixes.
                join(a.prefix, left.clone(), b.prefix, right.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entries: &[(u64, &'static str)]) -> Node<&'static str> {
        entries
            .iter()
            .fold(Node::Empty, |node, &(key, value)| node.insert(key, value))
    }

    fn value_of(node: &Node<&'static str>, key: u64) -> Option<&'static str> {
        node.get(key).map(|leaf| leaf.value)
    }

    #[test]
    fn test_union_with_empty_shares() {
        let a = build(&[(1, "a"), (2, "b")]);
        let empty = Node::Empty;

        assert!(union(&a, &empty).ptr_eq(&a));
        assert!(union(&empty, &a).ptr_eq(&a));
        assert!(union::<u8>(&Node::Empty, &Node::Empty).is_empty());
    }

    #[test]
    fn test_union_right_biased() {
        let a = build(&[(5, "a"), (9, "b"), (1, "c")]);
        let b = build(&[(9, "z")]);

        let merged = union(&a, &b);
        assert_eq!(value_of(&merged, 9), Some("z"));
        assert_eq!(value_of(&merged, 1), Some("c"));
        assert_eq!(value_of(&merged, 5), Some("a"));
        assert_eq!(merged.len(), 3);

        // Leaf on the left, branch on the right: the right still wins.
        let merged = union(&b, &a);
        assert_eq!(value_of(&merged, 9), Some("b"));
        assert!(merged.check().is_ok());
    }

    #[test]
    fn test_union_same_split_point() {
        let a = build(&[(0, "a0"), (8, "a8")]);
        let b = build(&[(1, "b1"), (9, "b9")]);

        // Both roots split on bit 8 under prefix 0.
        let merged = union(&a, &b);
        assert_eq!(merged.len(), 4);
        for key in [0, 1, 8, 9].iter() {
            assert!(merged.get(*key).is_some());
        }
        assert!(merged.check().is_ok());
    }

    #[test]
    fn test_union_nested_prefix() {
        // `a` splits on bit 0x100, `b` lives entirely under its left side.
        let a = build(&[(0x000, "a"), (0x100, "b")]);
        let b = build(&[(0x010, "c"), (0x011, "d")]);

        let merged = union(&a, &b);
        match &merged {
            Node::Branch(branch) => {
                assert_eq!(branch.bit, 0x100);
                assert_eq!(branch.left.len(), 3);
                if let Node::Branch(original) = &a {
                    assert!(branch.right.ptr_eq(&original.right));
                }
            }
            _ => panic!("expected a branch"),
        }

        // And the symmetric case.
        let merged = union(&b, &a);
        assert_eq!(merged.len(), 4);
        assert!(merged.check().is_ok());
    }

    #[test]
    fn test_union_disjoint_prefixes_joins() {
        let high = 1 << 63;
        let a = build(&[(1, "a"), (2, "b")]);
        let b = build(&[(high | 1, "c"), (high | 2, "d")]);

        let merged = union(&a, &b);
        match &merged {
            Node::Branch(branch) => {
                assert_eq!(branch.bit, high);
                assert!(branch.left.ptr_eq(&a));
                assert!(branch.right.ptr_eq(&b));
            }
            _ => panic!("expected a branch"),
        }
    }

    #[test]
    fn test_union_of_shared_subtrees_reuses_them() {
        let high = 1 << 63;
        let a = build(&[(1, "a"), (2, "b"), (high | 1, "c"), (high | 2, "d")]);

        assert!(union(&a, &a).ptr_eq(&a));

        // Only the left side differs; the right side is the same allocation.
        let b = a.insert(3, "e");
        let merged = union(&a, &b);
        match (&merged, &a) {
            (Node::Branch(merged), Node::Branch(original)) => {
                assert!(merged.right.ptr_eq(&original.right));
                assert_eq!(merged.left.len(), 3);
            }
            _ => panic!("expected branches"),
        }
        assert!(merged.check().is_ok());
    }

    #[test]
    fn test_union_with_does_not_share_identical_subtrees() {
        let a: Node<u32> = Node::Empty.insert(1, 1).insert(2, 2);

        let merged = union_with(&a, &a, &mut |l: &Arc<Leaf<u32>>, r: &Arc<Leaf<u32>>| {
            Arc::new(Leaf {
                key: l.key,
                value: l.value + r.value,
            })
        });

        assert!(!merged.ptr_eq(&a));
        assert_eq!(merged.get(1).map(|l| l.value), Some(2));
        assert_eq!(merged.get(2).map(|l| l.value), Some(4));
    }

    #[test]
    fn test_union_with_combines_collisions() {
        let a: Node<u32> = Node::Empty.insert(1, 10).insert(2, 20);
        let b: Node<u32> = Node::Empty.insert(2, 5).insert(3, 30);

        let merged = union_with(&a, &b, &mut |l: &Arc<Leaf<u32>>, r: &Arc<Leaf<u32>>| {
            Arc::new(Leaf {
                key: l.key,
                value: l.value + r.value,
            })
        });

        assert_eq!(merged.get(1).map(|l| l.value), Some(10));
        assert_eq!(merged.get(2).map(|l| l.value), Some(25));
        assert_eq!(merged.get(3).map(|l| l.value), Some(30));
    }
}
