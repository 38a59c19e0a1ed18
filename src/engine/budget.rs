//! Deterministic computation budget for matching loops.
//!
//! The budget is a plain counter, not a clock: the same inputs always spend
//! the same amount. It is polled only at the top of an iteration, so an
//! iteration that has started always completes and the final charge may
//! carry `consumed` past `limit`.

use crate::config::MatchingConfig;

/// Price list for the work done by one matching iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    /// Flat cost of processing one registry head
    pub iteration_cost: u64,
    /// Cost of one registry heap move
    pub step_cost: u64,
}

impl CostModel {
    pub fn new(iteration_cost: u64, step_cost: u64) -> Self {
        Self {
            iteration_cost,
            step_cost,
        }
    }

    /// Every iteration costs exactly one unit, whatever the registry does.
    pub fn unit() -> Self {
        Self::new(1, 0)
    }

    /// Cost of an iteration whose registry updates made `steps` moves.
    #[inline]
    pub fn iteration(&self, steps: usize) -> u64 {
        self.iteration_cost
            .saturating_add(self.step_cost.saturating_mul(steps as u64))
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::from(&MatchingConfig::default())
    }
}

impl From<&MatchingConfig> for CostModel {
    fn from(config: &MatchingConfig) -> Self {
        Self::new(config.iteration_cost, config.step_cost)
    }
}

/// Budget meter threaded through one matching operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    limit: u64,
    consumed: u64,
}

impl Budget {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.limit
    }

    #[inline]
    pub fn charge(&mut self, cost: u64) {
        self.consumed = self.consumed.saturating_add(cost);
    }
}
