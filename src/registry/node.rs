//! Registry node for slab-based storage.
//!
//! ## Design
//!
//! `RegistryNode` is what the slab stores for each user with a non-zero
//! balance: the value used for ordering, the stamp that breaks ties, and a
//! back-pointers (`tier`, `slot`, `worst_slot`) to its positions inside the
//! registry's heaps. They make removal of an arbitrary user O(log n) without
//! a search.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup

use crate::types::UserId;

/// Which heap of the registry a node currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Bounded heap holding the best-ranked entries
    Top,
    /// Unbounded heap holding everything else
    Overflow,
}

/// A `(user, value)` pair as seen by registry readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub user: UserId,
    pub value: u64,
}

/// Node stored in the slab.
#[derive(Debug, Clone)]
pub struct RegistryNode {
    /// Owner of the balance
    pub user: UserId,

    /// Balance mirrored from the ledger, never zero
    pub value: u64,

    /// Sequence number taken when the node reached `value`.
    /// Lower stamps win ties.
    pub stamp: u64,

    /// Heap holding this node
    pub tier: Tier,

    /// Index of this node inside its tier's best-rooted heap
    pub slot: usize,

    /// Index of this node inside the worst-rooted mirror of the top tier,
    /// meaningless while the node sits in the overflow tier
    pub worst_slot: usize,
}

impl RegistryNode {
    /// Create a node that is not yet placed in a heap
    #[inline]
    pub fn new(user: UserId, value: u64, stamp: u64) -> Self {
        Self {
            user,
            value,
            stamp,
            tier: Tier::Top,
            slot: usize::MAX,
            worst_slot: usize::MAX,
        }
    }

    /// Strict ranking: larger value first, then the earlier stamp.
    #[inline]
    pub fn outranks(&self, other: &RegistryNode) -> bool {
        self.value > other.value || (self.value == other.value && self.stamp < other.stamp)
    }

    #[inline]
    pub fn entry(&self) -> RegistryEntry {
        RegistryEntry {
            user: self.user,
            value: self.value,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_new() {
        let node = RegistryNode::new(7, 100, 3);

        assert_eq!(node.entry(), RegistryEntry { user: 7, value: 100 });
        assert_eq!(node.stamp, 3);
    }

    #[test]
    fn test_outranks_by_value() {
        let big = RegistryNode::new(1, 100, 5);
        let small = RegistryNode::new(2, 50, 1);

        assert!(big.outranks(&small));
        assert!(!small.outranks(&big));
    }

    #[test]
    fn test_outranks_ties_by_stamp() {
        let first = RegistryNode::new(1, 100, 1);
        let second = RegistryNode::new(2, 100, 2);

        assert!(first.outranks(&second));
        assert!(!second.outranks(&first));
        // strict: a node never outranks itself
        assert!(!first.outranks(&first));
    }
}
