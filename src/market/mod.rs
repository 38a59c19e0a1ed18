//! Market contexts: the position ledger and its registries.
//!
//! - [`MarketState`]: Ledger plus the four registries of one market
//! - [`Markets`]: Owns every market's state, keyed by [`crate::types::MarketId`]

pub mod book;
pub mod state;

pub use book::Markets;
pub use state::{MarketState, SideBook};
