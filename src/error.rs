//! Errors raised by the matching overlay.
//!
//! Budget exhaustion and empty registries are not errors: operations report
//! them through a partial [`crate::types::MatchOutcome`]. What remains are
//! precondition violations, which are rejected before any state is touched.

use thiserror::Error;

use crate::types::{MarketId, Population, Side};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    #[error("max sorted users must be at least 1")]
    InvalidCapacity,

    #[error("{population:?} index of the {side:?} side is zero")]
    ZeroIndex { side: Side, population: Population },

    #[error("market {0} does not exist")]
    UnknownMarket(MarketId),

    #[error("market {0} already exists")]
    MarketExists(MarketId),
}
