//! Position types for the peer-to-peer matching overlay.
//!
//! ## SSZ Serialization
//!
//! `Position` derives `SimpleSerialize` from ssz_rs so the ledger can be
//! hashed into a deterministic state root:
//! - Basic types (u64): Direct little-endian encoding
//! - Fixed-size composites: Concatenated little-endian fields
//!
//! ## Units
//!
//! `on_pool` is denominated in pool-index units and `in_p2p` in
//! peer-to-peer-index units. Neither is an underlying amount; convert with
//! [`crate::types::ray::ray_mul`] and the matching index.

use ssz_rs::prelude::*;

/// User/account identifier
pub type UserId = u64;

/// Lending market identifier
pub type MarketId = u64;

// ============================================================================
// Side enum
// ============================================================================

/// Which side of the market a position belongs to.
///
/// Represented as u8 for SSZ compatibility:
/// - Supplier = 0
/// - Borrower = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Side {
    /// Lends liquidity, earns the supply rate
    #[default]
    Supplier,
    /// Takes liquidity, pays the borrow rate
    Borrower,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Supplier => 0,
            Side::Borrower => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Supplier),
            1 => Some(Side::Borrower),
            _ => None,
        }
    }
}

// ============================================================================
// Population enum
// ============================================================================

/// Where a balance currently lives: on the underlying pool or matched
/// peer-to-peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Population {
    /// Balance supplied to / borrowed from the pool
    OnPool,
    /// Balance matched directly with the other side
    InP2P,
}

impl Population {
    /// The other population of the same side
    pub fn opposite(self) -> Self {
        match self {
            Population::OnPool => Population::InP2P,
            Population::InP2P => Population::OnPool,
        }
    }
}

// ============================================================================
// Position struct
// ============================================================================

/// Ledger record of one user on one side of one market.
///
/// ## SSZ Layout
///
/// Fixed-size container of 16 bytes (8 + 8).
///
/// ## Example
///
/// ```
/// use p2p_matcher::types::{Population, Position};
///
/// let position = Position::new(100, 20);
/// assert_eq!(position.balance(Population::OnPool), 100);
/// assert_eq!(position.balance(Population::InP2P), 20);
/// assert!(!position.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Position {
    /// Balance in pool-index units
    pub on_pool: u64,

    /// Balance in peer-to-peer-index units
    pub in_p2p: u64,
}

impl Position {
    /// Create a position from its two scaled balances
    pub fn new(on_pool: u64, in_p2p: u64) -> Self {
        Self { on_pool, in_p2p }
    }

    /// Balance held in the given population
    #[inline]
    pub fn balance(&self, population: Population) -> u64 {
        match population {
            Population::OnPool => self.on_pool,
            Population::InP2P => self.in_p2p,
        }
    }

    /// Mutable access to the balance held in the given population
    #[inline]
    pub fn balance_mut(&mut self, population: Population) -> &mut u64 {
        match population {
            Population::OnPool => &mut self.on_pool,
            Population::InP2P => &mut self.in_p2p,
        }
    }

    /// A position with both balances at zero holds nothing and is dropped
    /// from the ledger.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.on_pool == 0 && self.in_p2p == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Supplier.to_u8(), 0);
        assert_eq!(Side::Borrower.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Supplier));
        assert_eq!(Side::from_u8(1), Some(Side::Borrower));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_population_opposite() {
        assert_eq!(Population::OnPool.opposite(), Population::InP2P);
        assert_eq!(Population::InP2P.opposite(), Population::OnPool);
    }

    #[test]
    fn test_position_balance_accessors() {
        let mut position = Position::new(30, 20);

        *position.balance_mut(Population::OnPool) -= 30;
        *position.balance_mut(Population::InP2P) += 30;

        assert_eq!(position, Position::new(0, 50));
        assert!(!position.is_empty());
        assert!(Position::default().is_empty());
    }

    #[test]
    fn test_position_ssz_size() {
        let position = Position::new(100, 50);
        let bytes = ssz_rs::serialize(&position).expect("Failed to serialize");

        assert_eq!(bytes.len(), 16, "Position should serialize to 16 bytes");
        assert_eq!(&bytes[..8], &100u64.to_le_bytes());
    }
}
