//! # p2p-matcher
//!
//! Peer-to-peer matching overlay for a pooled lending market.
//!
//! Suppliers and borrowers who would otherwise both sit passively on a
//! shared lending pool are paired directly whenever possible; whatever cannot
//! be matched stays on the pool.
//!
//! ## Architecture
//!
//! - **Types**: Positions, index snapshots, notifications, ray math
//! - **Registry**: Bounded ordered view of balances with O(1) head
//! - **Market**: Position ledger plus its four registries
//! - **Engine**: The four budget-bounded match/unmatch operations
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: All balance math is integer ray arithmetic (10^27 scaling)
//! 3. **Pre-allocated Memory**: Slab arenas for registry entries
//! 4. **Synchronous Execution**: One operation at a time, run to completion

/// Core data types: Position, MarketIndexes, PositionUpdated
pub mod types;

/// Ordered position registry: slab-backed top heap plus overflow heap
pub mod registry;

/// Per-market ledger and registries
pub mod market;

/// Matching engine: the four match/unmatch operations
pub mod engine;

/// Error types
pub mod error;

/// Layered configuration
pub mod config;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{CostModel, Direction, MatchingEngine, NoopObserver, PositionObserver};
pub use error::MatchingError;
pub use market::{MarketState, Markets};
pub use registry::{PositionRegistry, RegistryEntry};
pub use types::{MarketIndexes, MatchOutcome, Population, Position, PositionUpdated, Side};
