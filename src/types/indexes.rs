//! Index snapshot consumed from index accounting.
//!
//! The matching engine never advances indexes itself. The caller reads the
//! current values once and passes them in; they stay frozen for the whole
//! operation.

use crate::types::ray::RAY;
use crate::types::Side;

/// Current growth indexes of one market, all in RAY units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketIndexes {
    /// Pool index of the supply side
    pub pool_supply: u128,
    /// Pool index of the borrow side
    pub pool_borrow: u128,
    /// Peer-to-peer index of the supply side
    pub p2p_supply: u128,
    /// Peer-to-peer index of the borrow side
    pub p2p_borrow: u128,
}

impl MarketIndexes {
    pub fn new(pool_supply: u128, pool_borrow: u128, p2p_supply: u128, p2p_borrow: u128) -> Self {
        Self {
            pool_supply,
            pool_borrow,
            p2p_supply,
            p2p_borrow,
        }
    }

    /// All four indexes at 1.0, the state of a freshly created market.
    pub fn unit() -> Self {
        Self::new(RAY, RAY, RAY, RAY)
    }

    /// `(pool_index, p2p_index)` used to convert balances of `side`.
    #[inline]
    pub fn for_side(&self, side: Side) -> (u128, u128) {
        match side {
            Side::Supplier => (self.pool_supply, self.p2p_supply),
            Side::Borrower => (self.pool_borrow, self.p2p_borrow),
        }
    }
}

impl Default for MarketIndexes {
    fn default() -> Self {
        Self::unit()
    }
}
