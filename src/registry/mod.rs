//! Ordered position registry for the matching engine.
//!
//! ## Architecture
//!
//! Each (market, side, population) keeps a [`PositionRegistry`] mirroring the
//! ledger's non-zero balances for ordering purposes:
//!
//! - **Slab-based storage**: O(1) node insertion and removal, slots reused
//! - **Top heap**: bounded by `cap`, always contains the global maximum
//! - **Overflow heap**: everything beyond the top `cap` entries
//!
//! ## Components
//!
//! - [`RegistryNode`]: Slab node with its heap back-pointers
//! - [`RankedHeap`]: Binary heap over slab keys, best or worst at the root
//! - [`PositionRegistry`]: The top heap and its mirror, the overflow heap,
//!   plus the user index
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `head` | O(1) |
//! | `value_of` | O(1) |
//! | `update` | O(log cap + log m) |
//!
//! `m` is the overflow size. Evicting the weakest top entry reads the root of
//! the worst-first mirror, so no step of `update` scans a tier. Every heap
//! move is counted in the value `update` returns.

pub mod heap;
pub mod node;
pub mod ordered;

pub use heap::{RankedHeap, Root};
pub use node::{RegistryEntry, RegistryNode, Tier};
pub use ordered::PositionRegistry;
