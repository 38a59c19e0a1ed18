//! Subscribers to position-updated notifications.
//!
//! The engine calls the observer only after the ledger and both registries
//! are committed for the iteration, so anything the observer reads back from
//! the market is already final.

use crate::types::PositionUpdated;

/// Receives one notification per mutated user per iteration.
pub trait PositionObserver {
    fn position_updated(&mut self, event: &PositionUpdated);
}

/// Observer that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PositionObserver for NoopObserver {
    #[inline]
    fn position_updated(&mut self, _event: &PositionUpdated) {}
}

/// Records notifications in emission order.
impl PositionObserver for Vec<PositionUpdated> {
    fn position_updated(&mut self, event: &PositionUpdated) {
        self.push(event.clone());
    }
}

impl<O: PositionObserver + ?Sized> PositionObserver for &mut O {
    #[inline]
    fn position_updated(&mut self, event: &PositionUpdated) {
        (**self).position_updated(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, Side};

    #[test]
    fn test_vec_observer_records_in_order() {
        let mut events: Vec<PositionUpdated> = Vec::new();

        events.position_updated(&PositionUpdated::new(1, 1, Side::Supplier, Position::new(1, 0)));
        events.position_updated(&PositionUpdated::new(1, 2, Side::Supplier, Position::new(0, 1)));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].user_id, 1);
        assert_eq!(events[1].user_id, 2);
    }

    #[test]
    fn test_observer_through_mut_reference() {
        fn notify<O: PositionObserver>(mut observer: O) {
            observer.position_updated(&PositionUpdated::default());
        }

        let mut events: Vec<PositionUpdated> = Vec::new();
        notify(&mut events);
        notify(&mut events);
        assert_eq!(events.len(), 2);
    }
}
