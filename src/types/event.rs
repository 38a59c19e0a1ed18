//! Position-updated notification emitted once per mutated user per iteration.
//!
//! ## SSZ Serialization
//!
//! Notifications are serialized using SSZ so that off-chain indexers can
//! rebuild the ledger byte-for-byte without re-running the matching loop.

use ssz_rs::prelude::*;

use crate::types::{MarketId, Position, Side, UserId};

/// New balances of one user after a matching iteration committed.
///
/// ## Example
///
/// ```
/// use p2p_matcher::types::{Position, PositionUpdated, Side};
///
/// let event = PositionUpdated::new(7, 42, Side::Supplier, Position::new(30, 20));
/// assert_eq!(event.side(), Side::Supplier);
/// assert_eq!(event.position(), Position::new(30, 20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct PositionUpdated {
    /// Market the position belongs to
    pub market_id: u64,

    /// Owner of the position
    pub user_id: u64,

    /// Side as u8 (0=Supplier, 1=Borrower)
    pub side_raw: u8,

    /// New balance in pool-index units
    pub on_pool: u64,

    /// New balance in peer-to-peer-index units
    pub in_p2p: u64,
}

impl PositionUpdated {
    pub fn new(market_id: MarketId, user_id: UserId, side: Side, position: Position) -> Self {
        Self {
            market_id,
            user_id,
            side_raw: side.to_u8(),
            on_pool: position.on_pool,
            in_p2p: position.in_p2p,
        }
    }

    /// Get the side of the updated position
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or_default()
    }

    /// The balances carried by this notification
    pub fn position(&self) -> Position {
        Position::new(self.on_pool, self.in_p2p)
    }

    /// SSZ encoding handed to external subscribers
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        ssz_rs::serialize(self).ok()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
