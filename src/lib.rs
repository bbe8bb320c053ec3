//! # Immutable Integer Map
//!
//! A persistent map from `u64` keys to values, built on a big-endian Patricia
//! trie with structural sharing.
//!
//! This crate provides an immutable integer map (after Okasaki and Gill's
//! "Fast Mergeable Integer Maps") that uses `Arc` to share unchanged subtrees
//! between versions.
//!
//! ## Features
//!
//! - **Immutable API**: All modifying operations return a new map instance
//! - **Structural Sharing**: Versions share every subtree an operation did not touch
//! - **Fast Merge**: The union of maps of sizes m and n costs O(m + n)
//! - **Ordered Iteration**: Entries come out in ascending key order
//!
//! ## Example
//!
//! ```rust
//! use intmap_immutable::IntMap;
//!
//! // Create a new map
//! let map = IntMap::new();
//!
//! // Insert some values (each operation returns a new map)
//! let map = map.insert(5, "a").insert(9, "b").insert(1, "c");
//! assert_eq!(map.get(5), Some(&"a"));
//! assert_eq!(map.get(7), None);
//!
//! // Merge, with the right-hand map winning collisions
//! let merged = map.merge(&IntMap::new().insert(9, "z"));
//! assert_eq!(merged.get(9), Some(&"z"));
//! assert_eq!(merged.get(1), Some(&"c"));
//! ```

mod bits;
mod iter;
mod map;
mod merge;
mod node;
#[cfg(feature = "serde")]
mod serde_impl;

// Re-export public types
pub use crate::iter::{Iter, Keys, Values};
pub use crate::map::IntMap;

/// A broken trie invariant, as reported by [`IntMap::check_invariants`].
///
/// The map's own operations never produce these; seeing one means a bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A branching bit with zero or several bits set
    BitNotPowerOfTwo { bit: u64 },
    /// A branch prefix with bits set at or below its branching bit
    UnmaskedPrefix { prefix: u64, bit: u64 },
    /// A branch with an empty side
    EmptyChild { prefix: u64, bit: u64 },
    /// A key (or child prefix) stored under a branch it does not belong to
    Misplaced { key: u64, prefix: u64, bit: u64 },
    /// A child branch splitting on a bit at least as significant as its parent's
    BitNotDescending { parent: u64, child: u64 },
    /// A branch whose cached size disagrees with its children
    SizeMismatch {
        prefix: u64,
        cached: usize,
        actual: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BitNotPowerOfTwo { bit } => {
                write!(f, "branching bit {:#x} is not a power of two", bit)
            }
            Error::UnmaskedPrefix { prefix, bit } => write!(
                f,
                "prefix {:#x} has bits set at or below branching bit {:#x}",
                prefix, bit
            ),
            Error::EmptyChild { prefix, bit } => write!(
                f,
                "branch {:#x}/{:#x} has an empty child",
                prefix, bit
            ),
            Error::Misplaced { key, prefix, bit } => write!(
                f,
                "key {:#x} does not belong under branch {:#x}/{:#x}",
                key, prefix, bit
            ),
            Error::BitNotDescending { parent, child } => write!(
                f,
                "child branching bit {:#x} is not below parent bit {:#x}",
                child, parent
            ),
            Error::SizeMismatch {
                prefix,
                cached,
                actual,
            } => write!(
                f,
                "branch {:#x} caches size {} but holds {} keys",
                prefix, cached, actual
            ),
        }
    }
}

impl std::error::Error for Error {}
