//! Matching engine module.
//!
//! ## Design Principles
//!
//! The matching engine is designed for:
//!
//! 1. **Determinism**: Same input always produces same output
//! 2. **Fixed-Point Math**: Ray conversions rounded toward zero, no floats
//! 3. **Bounded Work**: A caller-supplied budget caps every operation
//! 4. **Largest First**: The registry head is always drained first
//!
//! ## Matching Rules
//!
//! - **Match** moves liquidity from the pool into peer-to-peer
//! - **Unmatch** moves it back
//! - **Partial moves** are normal: the caller routes the rest via the pool
//! - **Budget** is checked only between iterations
//!
//! ## Example
//!
//! ```
//! use p2p_matcher::engine::{CostModel, MatchingEngine, NoopObserver};
//! use p2p_matcher::market::MarketState;
//! use p2p_matcher::types::{MarketIndexes, Position, Side};
//!
//! let mut market = MarketState::new(1, 16).unwrap();
//! market.update_position(Side::Supplier, 1, Position::new(100, 0));
//! market.update_position(Side::Supplier, 2, Position::new(50, 0));
//!
//! let engine = MatchingEngine::new(CostModel::unit());
//! let outcome = engine
//!     .match_suppliers(&mut market, &MarketIndexes::unit(), 120, u64::MAX, &mut NoopObserver)
//!     .unwrap();
//!
//! assert_eq!(outcome.moved, 120);
//! assert_eq!(market.position(Side::Supplier, 1), Position::new(0, 100));
//! assert_eq!(market.position(Side::Supplier, 2), Position::new(30, 20));
//! ```

pub mod budget;
pub mod matcher;
pub mod observer;

pub use budget::{Budget, CostModel};
pub use matcher::{Direction, MatchingEngine};
pub use observer::{NoopObserver, PositionObserver};
