//! Per-market matching context: the position ledger plus its four registries.
//!
//! ## Layout
//!
//! ```text
//! MarketState
//! ├── suppliers: SideBook
//! │   ├── positions   HashMap<UserId, Position>
//! │   ├── on_pool     PositionRegistry
//! │   └── in_p2p      PositionRegistry
//! └── borrowers: SideBook (same shape)
//! ```
//!
//! The ledger and the registries are only written together, through
//! [`MarketState::update_position`]. That method is also the entry point for
//! the deposit/withdraw handlers living outside this crate.
//!
//! ## Example
//!
//! ```
//! use p2p_matcher::market::MarketState;
//! use p2p_matcher::types::{Population, Position, Side};
//!
//! let mut market = MarketState::new(1, 16).unwrap();
//! market.update_position(Side::Supplier, 10, Position::new(100, 0));
//!
//! assert_eq!(market.registry_head(Side::Supplier, Population::OnPool), Some(10));
//! assert_eq!(market.position(Side::Supplier, 10), Position::new(100, 0));
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::error::MatchingError;
use crate::registry::{PositionRegistry, RegistryEntry};
use crate::types::{MarketId, Population, Position, Side, UserId};

/// Ledger and registries of one side of a market.
#[derive(Debug, Clone, Default)]
pub struct SideBook {
    positions: HashMap<UserId, Position>,
    on_pool: PositionRegistry,
    in_p2p: PositionRegistry,
    total_on_pool: u128,
    total_in_p2p: u128,
}

impl SideBook {
    fn registry(&self, population: Population) -> &PositionRegistry {
        match population {
            Population::OnPool => &self.on_pool,
            Population::InP2P => &self.in_p2p,
        }
    }

    fn total(&self, population: Population) -> u128 {
        match population {
            Population::OnPool => self.total_on_pool,
            Population::InP2P => self.total_in_p2p,
        }
    }
}

/// Matching context of a single lending market.
#[derive(Debug, Clone)]
pub struct MarketState {
    id: MarketId,
    max_sorted_users: usize,
    suppliers: SideBook,
    borrowers: SideBook,
}

impl MarketState {
    /// Create an empty market.
    ///
    /// # Errors
    ///
    /// [`MatchingError::InvalidCapacity`] if `max_sorted_users` is zero.
    pub fn new(id: MarketId, max_sorted_users: usize) -> Result<Self, MatchingError> {
        if max_sorted_users == 0 {
            return Err(MatchingError::InvalidCapacity);
        }
        Ok(Self {
            id,
            max_sorted_users,
            suppliers: SideBook::default(),
            borrowers: SideBook::default(),
        })
    }

    #[inline]
    pub fn id(&self) -> MarketId {
        self.id
    }

    /// Size bound of every registry's ordered top
    #[inline]
    pub fn max_sorted_users(&self) -> usize {
        self.max_sorted_users
    }

    #[inline]
    fn book(&self, side: Side) -> &SideBook {
        match side {
            Side::Supplier => &self.suppliers,
            Side::Borrower => &self.borrowers,
        }
    }

    #[inline]
    fn book_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Supplier => &mut self.suppliers,
            Side::Borrower => &mut self.borrowers,
        }
    }

    // ========================================================================
    // Update primitive
    // ========================================================================

    /// Overwrite `user`'s position on `side` and refresh both registries.
    ///
    /// An empty position removes the user from the ledger.
    ///
    /// # Returns
    ///
    /// The registry work performed, in heap moves.
    pub fn update_position(&mut self, side: Side, user: UserId, position: Position) -> usize {
        let cap = self.max_sorted_users;
        let book = self.book_mut(side);
        let previous = book.positions.get(&user).copied().unwrap_or_default();

        let steps = book.on_pool.update(user, previous.on_pool, position.on_pool, cap)
            + book.in_p2p.update(user, previous.in_p2p, position.in_p2p, cap);

        book.total_on_pool = book
            .total_on_pool
            .saturating_sub(previous.on_pool as u128)
            .saturating_add(position.on_pool as u128);
        book.total_in_p2p = book
            .total_in_p2p
            .saturating_sub(previous.in_p2p as u128)
            .saturating_add(position.in_p2p as u128);

        if position.is_empty() {
            book.positions.remove(&user);
        } else {
            book.positions.insert(user, position);
        }

        steps
    }

    // ========================================================================
    // Pure reads
    // ========================================================================

    /// Ledger entry of `user`, zero balances if absent
    #[inline]
    pub fn position(&self, side: Side, user: UserId) -> Position {
        self.book(side)
            .positions
            .get(&user)
            .copied()
            .unwrap_or_default()
    }

    /// User holding the largest balance of a population
    #[inline]
    pub fn registry_head(&self, side: Side, population: Population) -> Option<UserId> {
        self.head_entry(side, population).map(|entry| entry.user)
    }

    /// Head of a population with its value
    #[inline]
    pub fn head_entry(&self, side: Side, population: Population) -> Option<RegistryEntry> {
        self.book(side).registry(population).head()
    }

    /// Read-only access to one registry
    #[inline]
    pub fn registry(&self, side: Side, population: Population) -> &PositionRegistry {
        self.book(side).registry(population)
    }

    /// Sum of all scaled balances of a population
    #[inline]
    pub fn total(&self, side: Side, population: Population) -> u128 {
        self.book(side).total(population)
    }

    /// Number of users with a non-empty position on `side`
    #[inline]
    pub fn user_count(&self, side: Side) -> usize {
        self.book(side).positions.len()
    }

    /// All positions of `side`, in no particular order
    pub fn positions(&self, side: Side) -> impl Iterator<Item = (UserId, Position)> + '_ {
        self.book(side)
            .positions
            .iter()
            .map(|(&user, &position)| (user, position))
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 over every position, SSZ-encoded, in (side, user) order.
    ///
    /// Two markets with identical ledgers have identical roots regardless of
    /// the order in which they were built.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.id.to_le_bytes());

        for side in [Side::Supplier, Side::Borrower] {
            let book = self.book(side);
            let mut users: Vec<UserId> = book.positions.keys().copied().collect();
            users.sort_unstable();

            hasher.update([side.to_u8()]);
            for user in users {
                hasher.update(user.to_le_bytes());
                let encoded = ssz_rs::serialize(&book.positions[&user])
                    .expect("Position is a fixed-size SSZ container");
                hasher.update(&encoded);
            }
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
