//! Bounded ordered position registry.
//!
//! ## Architecture
//!
//! One registry exists per (market, side, population). It combines:
//!
//! - **Slab**: arena of [`RegistryNode`]s, slots reused after removal
//! - **Top heaps**: the `cap` best-ranked entries, held best-first and
//!   mirrored worst-first so eviction never scans
//! - **Overflow heap**: every other entry
//! - **HashMap**: user to slab key, for O(1) `value_of` and removal
//!
//! ## Invariant
//!
//! Every entry of the top heap outranks every entry of the overflow heap,
//! and the top heap is full whenever the overflow heap is non-empty. The
//! global maximum is therefore always the root of the top heap, which makes
//! [`PositionRegistry::head`] O(1) over the whole population.
//!
//! Zero values are never stored.
//!
//! ## Example
//!
//! ```
//! use p2p_matcher::registry::PositionRegistry;
//!
//! let mut registry = PositionRegistry::new();
//! registry.update(1, 0, 100, 4);
//! registry.update(2, 0, 50, 4);
//!
//! assert_eq!(registry.head().map(|e| e.user), Some(1));
//!
//! registry.update(1, 100, 0, 4);
//! assert_eq!(registry.head().map(|e| e.user), Some(2));
//! assert_eq!(registry.value_of(1), 0);
//! ```

use std::collections::HashMap;

use slab::Slab;

use crate::registry::heap::{RankedHeap, Root};
use crate::registry::node::{RegistryEntry, RegistryNode, Tier};
use crate::types::UserId;

/// Ordered view over the non-zero balances of one population.
#[derive(Debug, Clone)]
pub struct PositionRegistry {
    /// Entry storage
    nodes: Slab<RegistryNode>,

    /// User to slab key
    index: HashMap<UserId, usize>,

    /// Best-ranked entries, at most `cap`
    top: RankedHeap,

    /// Same keys as `top`, weakest at the root
    top_worst: RankedHeap,

    /// Remaining entries
    overflow: RankedHeap,

    /// Next tie-break stamp
    next_stamp: u64,
}

impl Default for PositionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            index: HashMap::new(),
            top: RankedHeap::new(Tier::Top, Root::Best),
            top_worst: RankedHeap::new(Tier::Top, Root::Worst),
            overflow: RankedHeap::new(Tier::Overflow, Root::Best),
            next_stamp: 0,
        }
    }

    /// Create a registry with pre-allocated room for `capacity` users
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            top: RankedHeap::new(Tier::Top, Root::Best),
            top_worst: RankedHeap::new(Tier::Top, Root::Worst),
            overflow: RankedHeap::with_capacity(Tier::Overflow, Root::Best, capacity),
            next_stamp: 0,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Entry with the largest value, ties going to the entry that reached
    /// its value first.
    #[inline]
    pub fn head(&self) -> Option<RegistryEntry> {
        self.top
            .peek()
            .or_else(|| self.overflow.peek())
            .map(|key| self.nodes[key].entry())
    }

    /// Stored value of `user`, zero if absent
    #[inline]
    pub fn value_of(&self, user: UserId) -> u64 {
        self.index
            .get(&user)
            .map_or(0, |&key| self.nodes[key].value)
    }

    #[inline]
    pub fn contains(&self, user: UserId) -> bool {
        self.index.contains_key(&user)
    }

    /// Number of users with a non-zero value
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entries currently held by the bounded top heap
    #[inline]
    pub fn top_len(&self) -> usize {
        self.top.len()
    }

    /// Entries currently held outside the top heap
    #[inline]
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// All entries, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = RegistryEntry> + '_ {
        self.nodes.iter().map(|(_, node)| node.entry())
    }

    // ========================================================================
    // Update primitive
    // ========================================================================

    /// Replace `user`'s value `previous` with `new`.
    ///
    /// `previous` must be the currently stored value (zero if absent); this
    /// is checked in debug builds. A `new` value of zero removes the user.
    /// Writing the stored value again is a no-op and keeps the user's tie
    /// priority.
    ///
    /// `cap` bounds the top heap. A `cap` of zero is a caller error and is
    /// treated as one.
    ///
    /// # Returns
    ///
    /// The number of structural moves performed.
    pub fn update(&mut self, user: UserId, previous: u64, new: u64, cap: usize) -> usize {
        let cap = cap.max(1);
        let stored = self.value_of(user);
        debug_assert_eq!(
            stored, previous,
            "registry holds {} for user {}, caller passed {}",
            stored, user, previous
        );

        if stored == new {
            return self.rebalance(cap);
        }

        let mut steps = 0;
        if stored > 0 {
            steps += self.remove(user, cap);
        }
        if new > 0 {
            steps += self.insert(user, new, cap);
        }
        steps
    }

    fn insert(&mut self, user: UserId, value: u64, cap: usize) -> usize {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let key = self.nodes.insert(RegistryNode::new(user, value, stamp));
        self.index.insert(user, key);

        // Enter at the top; if that overfills it the weakest entry, which
        // may be the new one, drops to the overflow heap.
        let steps = self.top.push(key, &mut self.nodes)
            + self.top_worst.push(key, &mut self.nodes);
        steps + self.rebalance(cap)
    }

    fn remove(&mut self, user: UserId, cap: usize) -> usize {
        let Some(key) = self.index.remove(&user) else {
            return 0;
        };

        let steps = match self.nodes[key].tier {
            Tier::Top => self.remove_top(key),
            Tier::Overflow => self.overflow.remove(key, &mut self.nodes),
        };
        self.nodes.remove(key);

        steps + self.rebalance(cap)
    }

    fn remove_top(&mut self, key: usize) -> usize {
        self.top.remove(key, &mut self.nodes) + self.top_worst.remove(key, &mut self.nodes)
    }

    /// Move entries across the tier boundary until the top heaps hold
    /// exactly `min(cap, len)` entries.
    fn rebalance(&mut self, cap: usize) -> usize {
        let mut steps = 0;

        while self.top.len() > cap {
            let Some(key) = self.top_worst.peek() else {
                break;
            };
            steps += self.remove_top(key) + self.overflow.push(key, &mut self.nodes);
        }

        while self.top.len() < cap {
            let Some((key, moved)) = self.overflow.pop(&mut self.nodes) else {
                break;
            };
            steps += moved
                + self.top.push(key, &mut self.nodes)
                + self.top_worst.push(key, &mut self.nodes);
        }

        steps
    }

    /// Check the registry's structural invariants (for testing)
    #[cfg(test)]
    pub(crate) fn check_invariants(&self, cap: usize) {
        assert!(self.top.is_consistent(&self.nodes), "top heap broken");
        assert!(self.top_worst.is_consistent(&self.nodes), "top mirror broken");
        assert!(self.overflow.is_consistent(&self.nodes), "overflow heap broken");
        assert_eq!(self.top.len(), self.top_worst.len());
        assert_eq!(self.top.len() + self.overflow.len(), self.nodes.len());
        assert_eq!(self.index.len(), self.nodes.len());
        assert!(self.top.len() <= cap.max(1));
        if !self.overflow.is_empty() {
            assert_eq!(self.top.len(), cap.max(1), "top must be full while overflow is used");
            let weakest_top = &self.nodes[self.top_worst.peek().unwrap()];
            let best_overflow = &self.nodes[self.overflow.peek().unwrap()];
            assert!(weakest_top.outranks(best_overflow), "top/overflow boundary broken");
        }
        for (&user, &key) in &self.index {
            assert_eq!(self.nodes[key].user, user);
            assert!(self.nodes[key].value > 0, "zero values must not be stored");
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
