//! Bit arithmetic used to navigate a big-endian Patricia trie.
//!
//! Branching bits are represented as the bit itself (a power of two), not as
//! a bit index, so that comparing two branching bits numerically compares
//! their significance directly.

/// Which child of a branch a key descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The branching bit of the key is 0.
    Left,
    /// The branching bit of the key is 1.
    Right,
}

impl Side {
    /// The other child.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Returns the most significant set bit of `x` as a power of two.
///
/// `x` must be non-zero.
#[inline]
pub fn highest_bit(x: u64) -> u64 {
    debug_assert_ne!(x, 0);
    1 << (63 - x.leading_zeros())
}

/// Finds the most significant bit in which two keys disagree.
///
/// Callers never pass equal keys.
#[inline]
pub fn highest_differing_bit(a: u64, b: u64) -> u64 {
    debug_assert_ne!(a, b);
    highest_bit(a ^ b)
}

/// Clears `bit` and every bit less significant than it.
#[inline]
pub fn mask_above(key: u64, bit: u64) -> u64 {
    debug_assert!(bit.is_power_of_two());
    key & !(bit | (bit - 1))
}

/// Decides the descent direction of `key` at a branch on `bit`.
#[inline]
pub fn side_of(key: u64, bit: u64) -> Side {
    if key & bit == 0 {
        Side::Left
    } else {
        Side::Right
    }
}

/// Checks whether `key` agrees with `prefix` on every bit above `bit`.
#[inline]
pub fn matches_prefix(key: u64, prefix: u64, bit: u64) -> bool {
    mask_above(key, bit) == prefix
}
