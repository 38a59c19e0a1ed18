//! Result of one matching operation.

/// What a match/unmatch call managed to do before it stopped.
///
/// The caller routes `requested - moved` to or from the pool itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    /// Underlying amount moved between populations
    pub moved: u64,

    /// Budget units spent, may exceed the budget by the cost of the last
    /// iteration since an iteration is never interrupted
    pub budget_consumed: u64,

    /// Number of registry heads processed
    pub iterations: u64,
}

impl MatchOutcome {
    /// Amount the operation could not move
    #[inline]
    pub fn remaining(&self, requested: u64) -> u64 {
        requested.saturating_sub(self.moved)
    }

    /// Whether the full request was satisfied
    #[inline]
    pub fn is_complete(&self, requested: u64) -> bool {
        self.moved >= requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_remaining() {
        let outcome = MatchOutcome {
            moved: 70,
            budget_consumed: 3,
            iterations: 2,
        };

        assert_eq!(outcome.remaining(100), 30);
        assert!(!outcome.is_complete(100));
        assert!(outcome.is_complete(70));
    }

    #[test]
    fn test_default_outcome_is_noop() {
        let outcome = MatchOutcome::default();

        assert_eq!(outcome.moved, 0);
        assert_eq!(outcome.budget_consumed, 0);
        assert_eq!(outcome.remaining(50), 50);
    }
}
