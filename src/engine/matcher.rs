//! The four budget-bounded matching operations.
//!
//! ## Loop
//!
//! Every operation drains the head of one registry until the requested
//! amount is moved, the registry is empty, or the budget is spent:
//!
//! ```text
//! while remaining > 0 and source registry not empty:
//!     stop if budget exhausted            <- only yield point
//!     head      = source registry head
//!     to_move   = min(underlying(head.source), remaining)
//!     head.source      -= scaled(to_move, source index)
//!     head.destination += scaled(to_move, destination index)
//!     commit ledger + both registries
//!     charge budget, then notify observer
//! ```
//!
//! | Operation | Side | Source | Destination |
//! |-----------|------|--------|-------------|
//! | `match_suppliers` | suppliers | on pool | in P2P |
//! | `unmatch_suppliers` | suppliers | in P2P | on pool |
//! | `match_borrowers` | borrowers | on pool | in P2P |
//! | `unmatch_borrowers` | borrowers | in P2P | on pool |
//!
//! When an iteration takes the head's whole balance, the source balance is
//! set to exactly zero rather than left with rounding dust, so each
//! iteration either removes the head from the source registry or finishes
//! the request. A balance whose underlying value does not fit a `u64` is
//! never taken whole: the request is capped at `u64::MAX`, and only its
//! conversion is removed from the source.

use std::num::NonZeroU128;

use tracing::{debug, trace, warn};

use crate::config::MatchingConfig;
use crate::engine::budget::{Budget, CostModel};
use crate::engine::observer::PositionObserver;
use crate::error::MatchingError;
use crate::market::MarketState;
use crate::types::ray::{ray_div_nonzero, ray_mul_checked, zero_floor_sub};
use crate::types::{MarketIndexes, MatchOutcome, Population, PositionUpdated, Side};

/// Direction liquidity moves between the two populations of a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// On pool to peer-to-peer
    Match,
    /// Peer-to-peer back to the pool
    Unmatch,
}

impl Direction {
    /// Population drained by this direction
    #[inline]
    pub fn source(self) -> Population {
        match self {
            Direction::Match => Population::OnPool,
            Direction::Unmatch => Population::InP2P,
        }
    }

    /// Population credited by this direction
    #[inline]
    pub fn destination(self) -> Population {
        self.source().opposite()
    }
}

/// Matching engine.
///
/// Stateless apart from its cost model: every market is passed in
/// explicitly, together with the index snapshot for the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine {
    cost: CostModel,
}

impl MatchingEngine {
    pub fn new(cost: CostModel) -> Self {
        Self { cost }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(CostModel::from(config))
    }

    #[inline]
    pub fn cost(&self) -> CostModel {
        self.cost
    }

    /// Move supplier liquidity from the pool into peer-to-peer.
    pub fn match_suppliers<O: PositionObserver>(
        &self,
        market: &mut MarketState,
        indexes: &MarketIndexes,
        amount: u64,
        budget: u64,
        observer: &mut O,
    ) -> Result<MatchOutcome, MatchingError> {
        self.execute(market, indexes, Side::Supplier, Direction::Match, amount, budget, observer)
    }

    /// Move supplier liquidity from peer-to-peer back to the pool.
    pub fn unmatch_suppliers<O: PositionObserver>(
        &self,
        market: &mut MarketState,
        indexes: &MarketIndexes,
        amount: u64,
        budget: u64,
        observer: &mut O,
    ) -> Result<MatchOutcome, MatchingError> {
        self.execute(market, indexes, Side::Supplier, Direction::Unmatch, amount, budget, observer)
    }

    /// Move borrower debt from the pool into peer-to-peer.
    pub fn match_borrowers<O: PositionObserver>(
        &self,
        market: &mut MarketState,
        indexes: &MarketIndexes,
        amount: u64,
        budget: u64,
        observer: &mut O,
    ) -> Result<MatchOutcome, MatchingError> {
        self.execute(market, indexes, Side::Borrower, Direction::Match, amount, budget, observer)
    }

    /// Move borrower debt from peer-to-peer back to the pool.
    pub fn unmatch_borrowers<O: PositionObserver>(
        &self,
        market: &mut MarketState,
        indexes: &MarketIndexes,
        amount: u64,
        budget: u64,
        observer: &mut O,
    ) -> Result<MatchOutcome, MatchingError> {
        self.execute(market, indexes, Side::Borrower, Direction::Unmatch, amount, budget, observer)
    }

    /// Shared loop behind the four operations.
    ///
    /// A zero `budget` returns an empty outcome without looking at anything
    /// else. Otherwise the side's two indexes must be non-zero; they are
    /// checked before any state changes.
    #[allow(clippy::too_many_arguments)]
    pub fn execute<O: PositionObserver>(
        &self,
        market: &mut MarketState,
        indexes: &MarketIndexes,
        side: Side,
        direction: Direction,
        amount: u64,
        budget: u64,
        observer: &mut O,
    ) -> Result<MatchOutcome, MatchingError> {
        if budget == 0 {
            return Ok(MatchOutcome::default());
        }

        let source = direction.source();
        let destination = direction.destination();
        let (pool_raw, p2p_raw) = indexes.for_side(side);
        let pool_index = NonZeroU128::new(pool_raw).ok_or(MatchingError::ZeroIndex {
            side,
            population: Population::OnPool,
        })?;
        let p2p_index = NonZeroU128::new(p2p_raw).ok_or(MatchingError::ZeroIndex {
            side,
            population: Population::InP2P,
        })?;
        let (source_index, destination_index) = match source {
            Population::OnPool => (pool_index, p2p_index),
            Population::InP2P => (p2p_index, pool_index),
        };

        debug!(
            market = market.id(),
            ?side,
            ?direction,
            amount,
            budget,
            "matching started"
        );

        let mut meter = Budget::new(budget);
        let mut remaining = amount;
        let mut iterations = 0u64;

        while remaining > 0 {
            if meter.is_exhausted() {
                warn!(
                    market = market.id(),
                    ?side,
                    ?direction,
                    remaining,
                    limit = meter.limit(),
                    consumed = meter.consumed(),
                    "budget exhausted before request was filled"
                );
                break;
            }

            let Some(head) = market.head_entry(side, source) else {
                break;
            };

            let mut position = market.position(side, head.user);
            let source_balance = position.balance(source);
            let available = ray_mul_checked(source_balance, source_index.get());
            let to_move = available.unwrap_or(u64::MAX).min(remaining);
            remaining -= to_move;

            *position.balance_mut(source) = if available == Some(to_move) {
                0
            } else {
                zero_floor_sub(source_balance, ray_div_nonzero(to_move, source_index))
            };
            let credited = position.balance_mut(destination);
            *credited = credited.saturating_add(ray_div_nonzero(to_move, destination_index));

            // Effects are committed before the observer runs
            let steps = market.update_position(side, head.user, position);
            meter.charge(self.cost.iteration(steps));
            iterations += 1;

            trace!(
                market = market.id(),
                user = head.user,
                to_move,
                on_pool = position.on_pool,
                in_p2p = position.in_p2p,
                "position matched"
            );
            let event = PositionUpdated::new(market.id(), head.user, side, position);
            observer.position_updated(&event);
        }

        let outcome = MatchOutcome {
            moved: amount - remaining,
            budget_consumed: meter.consumed(),
            iterations,
        };

        debug!(
            market = market.id(),
            ?side,
            ?direction,
            moved = outcome.moved,
            consumed = outcome.budget_consumed,
            iterations,
            "matching finished"
        );

        Ok(outcome)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
