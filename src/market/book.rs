//! Owner of every market's matching context.

use std::collections::HashMap;

use crate::error::MatchingError;
use crate::market::MarketState;
use crate::types::MarketId;

/// All markets known to the overlay, each with its own ledger and
/// registries. Operations receive one [`MarketState`] at a time.
#[derive(Debug, Clone)]
pub struct Markets {
    markets: HashMap<MarketId, MarketState>,
    max_sorted_users: usize,
}

impl Markets {
    /// # Errors
    ///
    /// [`MatchingError::InvalidCapacity`] if `max_sorted_users` is zero.
    pub fn new(max_sorted_users: usize) -> Result<Self, MatchingError> {
        if max_sorted_users == 0 {
            return Err(MatchingError::InvalidCapacity);
        }
        Ok(Self {
            markets: HashMap::new(),
            max_sorted_users,
        })
    }

    pub fn create_market(&mut self, id: MarketId) -> Result<&mut MarketState, MatchingError> {
        if self.markets.contains_key(&id) {
            return Err(MatchingError::MarketExists(id));
        }
        let market = MarketState::new(id, self.max_sorted_users)?;
        Ok(self.markets.entry(id).or_insert(market))
    }

    pub fn market(&self, id: MarketId) -> Result<&MarketState, MatchingError> {
        self.markets.get(&id).ok_or(MatchingError::UnknownMarket(id))
    }

    pub fn market_mut(&mut self, id: MarketId) -> Result<&mut MarketState, MatchingError> {
        self.markets
            .get_mut(&id)
            .ok_or(MatchingError::UnknownMarket(id))
    }

    pub fn remove_market(&mut self, id: MarketId) -> Result<MarketState, MatchingError> {
        self.markets
            .remove(&id)
            .ok_or(MatchingError::UnknownMarket(id))
    }

    #[inline]
    pub fn contains(&self, id: MarketId) -> bool {
        self.markets.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Market ids in ascending order
    pub fn ids(&self) -> Vec<MarketId> {
        let mut ids: Vec<MarketId> = self.markets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, Side};

    #[test]
    fn test_markets_create_and_lookup() {
        let mut markets = Markets::new(4).unwrap();

        let market = markets.create_market(7).unwrap();
        market.update_position(Side::Supplier, 1, Position::new(10, 0));

        assert_eq!(markets.len(), 1);
        assert!(markets.contains(7));
        assert_eq!(markets.market(7).unwrap().user_count(Side::Supplier), 1);
        assert_eq!(markets.market(7).unwrap().max_sorted_users(), 4);
    }

    #[test]
    fn test_markets_duplicate_and_unknown() {
        let mut markets = Markets::new(4).unwrap();
        markets.create_market(1).unwrap();

        assert_eq!(
            markets.create_market(1).unwrap_err(),
            MatchingError::MarketExists(1)
        );
        assert_eq!(
            markets.market(2).unwrap_err(),
            MatchingError::UnknownMarket(2)
        );
        assert!(markets.market_mut(2).is_err());
    }

    #[test]
    fn test_markets_remove() {
        let mut markets = Markets::new(4).unwrap();
        markets.create_market(3).unwrap();
        markets.create_market(1).unwrap();
        assert_eq!(markets.ids(), vec![1, 3]);

        let removed = markets.remove_market(3).unwrap();
        assert_eq!(removed.id(), 3);
        assert_eq!(markets.ids(), vec![1]);
        assert!(markets.remove_market(3).is_err());
    }

    #[test]
    fn test_markets_reject_zero_capacity() {
        assert!(Markets::new(0).is_err());
    }
}
