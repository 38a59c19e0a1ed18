//! Array-backed binary heap over slab keys.
//!
//! ## Design
//!
//! A `RankedHeap` only stores slab keys; the ranking data lives in the
//! [`RegistryNode`]s of the slab. Every move of a key also rewrites the
//! node's back-pointer for this heap, so the registry can find any user's
//! heap position in O(1).
//!
//! ```text
//!            keys[0]            <- best-ranked node (Root::Best)
//!          /         \            worst-ranked node (Root::Worst)
//!      keys[1]     keys[2]
//!      /    \       /
//!  keys[3] keys[4] keys[5]
//! ```
//!
//! The registry's top tier is held twice, once per root, so both its best
//! and its weakest entry are reachable without a scan.
//!
//! Every mutating method returns the number of structural moves it made.
//! The matching engine charges that work against its budget.

use slab::Slab;

use crate::registry::node::{RegistryNode, Tier};

/// Which end of the ranking sits at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// Max-heap under [`RegistryNode::outranks`]
    Best,
    /// Min-heap under [`RegistryNode::outranks`]
    Worst,
}

/// Heap of slab keys ordered by [`RegistryNode::outranks`].
#[derive(Debug, Clone)]
pub struct RankedHeap {
    tier: Tier,
    root: Root,
    keys: Vec<usize>,
}

impl RankedHeap {
    pub fn new(tier: Tier, root: Root) -> Self {
        Self::with_capacity(tier, root, 0)
    }

    pub fn with_capacity(tier: Tier, root: Root, capacity: usize) -> Self {
        Self {
            tier,
            root,
            keys: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Slab key at the root
    #[inline]
    pub fn peek(&self) -> Option<usize> {
        self.keys.first().copied()
    }

    /// Insert a key and restore heap order.
    pub fn push(&mut self, key: usize, nodes: &mut Slab<RegistryNode>) -> usize {
        let slot = self.keys.len();
        self.keys.push(key);

        let node = &mut nodes[key];
        node.tier = self.tier;
        self.set_slot(node, slot);

        1 + self.sift_up(slot, nodes)
    }

    /// Remove `key`, located through its back-pointer, returning the work done.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not in this heap
    pub fn remove(&mut self, key: usize, nodes: &mut Slab<RegistryNode>) -> usize {
        let slot = self.slot_of(&nodes[key]);
        let (removed, steps) = self.remove_at(slot, nodes);
        debug_assert_eq!(removed, key);
        steps
    }

    /// Remove the key at `slot`, returning it with the work done.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds
    pub fn remove_at(&mut self, slot: usize, nodes: &mut Slab<RegistryNode>) -> (usize, usize) {
        let last = self.keys.len() - 1;
        let mut steps = 1;

        if slot != last {
            self.swap(slot, last, nodes);
            steps += 1;
        }
        let key = self.keys.pop().expect("heap is not empty");

        // The key moved into `slot` may need to go either way
        if slot < self.keys.len() {
            let down = self.sift_down(slot, nodes);
            steps += if down == 0 { self.sift_up(slot, nodes) } else { down };
        }

        (key, steps)
    }

    /// Remove the root key.
    pub fn pop(&mut self, nodes: &mut Slab<RegistryNode>) -> Option<(usize, usize)> {
        if self.keys.is_empty() {
            return None;
        }
        Some(self.remove_at(0, nodes))
    }

    /// Back-pointer this heap maintains on `node`
    #[inline]
    pub fn slot_of(&self, node: &RegistryNode) -> usize {
        match self.root {
            Root::Best => node.slot,
            Root::Worst => node.worst_slot,
        }
    }

    #[inline]
    fn set_slot(&self, node: &mut RegistryNode, slot: usize) {
        match self.root {
            Root::Best => node.slot = slot,
            Root::Worst => node.worst_slot = slot,
        }
    }

    /// Whether `a` belongs above `b`
    #[inline]
    fn above(&self, a: &RegistryNode, b: &RegistryNode) -> bool {
        match self.root {
            Root::Best => a.outranks(b),
            Root::Worst => b.outranks(a),
        }
    }

    fn sift_up(&mut self, mut slot: usize, nodes: &mut Slab<RegistryNode>) -> usize {
        let mut steps = 0;
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.above(&nodes[self.keys[slot]], &nodes[self.keys[parent]]) {
                break;
            }
            self.swap(slot, parent, nodes);
            slot = parent;
            steps += 1;
        }
        steps
    }

    fn sift_down(&mut self, mut slot: usize, nodes: &mut Slab<RegistryNode>) -> usize {
        let len = self.keys.len();
        let mut steps = 0;
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;

            if left < len && self.above(&nodes[self.keys[left]], &nodes[self.keys[best]]) {
                best = left;
            }
            if right < len && self.above(&nodes[self.keys[right]], &nodes[self.keys[best]]) {
                best = right;
            }
            if best == slot {
                return steps;
            }

            self.swap(slot, best, nodes);
            slot = best;
            steps += 1;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize, nodes: &mut Slab<RegistryNode>) {
        self.keys.swap(a, b);
        self.set_slot(&mut nodes[self.keys[a]], a);
        self.set_slot(&mut nodes[self.keys[b]], b);
    }

    /// Check heap order and back-pointers (for testing)
    #[cfg(test)]
    pub fn is_consistent(&self, nodes: &Slab<RegistryNode>) -> bool {
        self.keys.iter().enumerate().all(|(slot, &key)| {
            let node = &nodes[key];
            let placed = self.slot_of(node) == slot && node.tier == self.tier;
            let ordered = slot == 0 || !self.above(node, &nodes[self.keys[(slot - 1) / 2]]);
            placed && ordered
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_node(nodes: &mut Slab<RegistryNode>, user: u64, value: u64) -> usize {
        nodes.insert(RegistryNode::new(user, value, user))
    }

    fn filled_heap(root: Root, values: &[u64]) -> (RankedHeap, Slab<RegistryNode>) {
        let mut nodes = Slab::with_capacity(values.len());
        let mut heap = RankedHeap::with_capacity(Tier::Top, root, values.len());
        for (user, &value) in values.iter().enumerate() {
            let key = insert_node(&mut nodes, user as u64, value);
            heap.push(key, &mut nodes);
        }
        (heap, nodes)
    }

    #[test]
    fn test_heap_new() {
        let heap = RankedHeap::new(Tier::Overflow, Root::Best);

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert!(heap.peek().is_none());
    }

    #[test]
    fn test_heap_push_keeps_max_at_root() {
        let (heap, nodes) = filled_heap(Root::Best, &[10, 50, 30, 70, 20]);

        assert_eq!(heap.len(), 5);
        assert_eq!(nodes[heap.peek().unwrap()].value, 70);
        assert!(heap.is_consistent(&nodes));
    }

    #[test]
    fn test_heap_pop_in_rank_order() {
        let (mut heap, mut nodes) = filled_heap(Root::Best, &[10, 50, 30, 70, 20, 50]);

        let mut popped = Vec::new();
        while let Some((key, _)) = heap.pop(&mut nodes) {
            popped.push((nodes[key].value, nodes[key].user));
            assert!(heap.is_consistent(&nodes));
        }

        // equal values come out by stamp (user id doubles as stamp here)
        assert_eq!(popped, vec![(70, 3), (50, 1), (50, 5), (30, 2), (20, 4), (10, 0)]);
    }

    #[test]
    fn test_heap_remove_middle() {
        let (mut heap, mut nodes) = filled_heap(Root::Best, &[90, 80, 70, 10, 20, 60, 50]);

        let slot = nodes.iter().find(|(_, n)| n.value == 80).map(|(_, n)| n.slot).unwrap();
        let (key, steps) = heap.remove_at(slot, &mut nodes);

        assert_eq!(nodes[key].value, 80);
        assert!(steps >= 1);
        assert_eq!(heap.len(), 6);
        assert!(heap.is_consistent(&nodes));
    }

    #[test]
    fn test_heap_remove_last() {
        let (mut heap, mut nodes) = filled_heap(Root::Best, &[30, 20, 10]);

        let (key, steps) = heap.remove_at(2, &mut nodes);

        assert_eq!(nodes[key].value, 10);
        assert_eq!(steps, 1);
        assert!(heap.is_consistent(&nodes));
    }

    #[test]
    fn test_worst_root_holds_weakest() {
        let (heap, nodes) = filled_heap(Root::Worst, &[40, 90, 15, 60, 15, 80]);

        let weakest = &nodes[heap.peek().unwrap()];

        // two nodes hold 15, the later stamp ranks lower
        assert_eq!(weakest.value, 15);
        assert_eq!(weakest.user, 4);
        assert!(heap.is_consistent(&nodes));
    }

    #[test]
    fn test_mirrored_heaps_share_nodes() {
        let mut nodes = Slab::new();
        let mut best = RankedHeap::new(Tier::Top, Root::Best);
        let mut worst = RankedHeap::new(Tier::Top, Root::Worst);
        for (user, value) in [(1, 30), (2, 10), (3, 50), (4, 20), (5, 40)] {
            let key = insert_node(&mut nodes, user, value);
            best.push(key, &mut nodes);
            worst.push(key, &mut nodes);
        }

        // drop the weakest from both sides through its back-pointers
        let key = worst.peek().unwrap();
        worst.remove(key, &mut nodes);
        best.remove(key, &mut nodes);

        assert_eq!(nodes[key].value, 10);
        assert_eq!(nodes[best.peek().unwrap()].value, 50);
        assert_eq!(nodes[worst.peek().unwrap()].value, 20);
        assert!(best.is_consistent(&nodes));
        assert!(worst.is_consistent(&nodes));
    }
}
