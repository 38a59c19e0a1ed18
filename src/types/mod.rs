//! Core data types for the matching overlay
//!
//! Ledger and notification types implement SSZ serialization for
//! deterministic encoding.
//!
//! ## Types
//!
//! - [`Position`]: Balances of one user on one side of a market
//! - [`Side`]: Supplier or Borrower
//! - [`Population`]: On pool or in peer-to-peer
//! - [`MarketIndexes`]: Frozen index snapshot for one operation
//! - [`PositionUpdated`]: Notification emitted after each committed iteration
//! - [`MatchOutcome`]: Result of a matching operation
//!
//! ## Fixed-Point Arithmetic
//!
//! Amounts and scaled balances are `u64`; indexes are `u128` rays (10^27).
//! See [`ray`] for the conversion rules.

mod event;
mod indexes;
mod outcome;
mod position;
pub mod ray;

// Re-export all types at module level
pub use event::PositionUpdated;
pub use indexes::MarketIndexes;
pub use outcome::MatchOutcome;
pub use position::{MarketId, Population, Position, Side, UserId};
