//! Fan-in bookkeeping for the parallel top-tracks stage
//!
//! One `FanOutState` per request. It only counts; the coordinator owns the
//! records and decides what to do with each [`FanOutProgress`].

/// Outcome of recording one completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutProgress {
    /// More completions outstanding
    Pending,
    /// This completion was the last one and nothing failed
    Completed,
    /// This completion was the first failure
    Failed,
    /// The outcome was already decided; this completion is ignored
    Settled,
}

/// Completion counter with a first-failure flag
///
/// Invariants: `completed <= total`, `completed` never decreases, and
/// exactly one call to `record_*` returns `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutState {
    total: usize,
    completed: usize,
    failed: bool,
    settled: bool,
}

impl FanOutState {
    /// State for `total` outstanding fetches
    ///
    /// With `total == 0` there is nothing to wait for: the state starts out
    /// settled and complete.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: false,
            settled: total == 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Every fetch finished and none failed
    pub fn is_complete(&self) -> bool {
        !self.failed && self.completed == self.total
    }

    /// Outcome already emitted
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn record_success(&mut self) -> FanOutProgress {
        if self.settled {
            return FanOutProgress::Settled;
        }
        self.bump();
        if self.completed == self.total {
            self.settled = true;
            FanOutProgress::Completed
        } else {
            FanOutProgress::Pending
        }
    }

    pub fn record_failure(&mut self) -> FanOutProgress {
        if self.settled {
            return FanOutProgress::Settled;
        }
        self.bump();
        self.failed = true;
        self.settled = true;
        FanOutProgress::Failed
    }

    fn bump(&mut self) {
        if self.completed < self.total {
            self.completed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_exactly_on_last_success() {
        let mut state = FanOutState::new(3);
        assert_eq!(state.record_success(), FanOutProgress::Pending);
        assert_eq!(state.record_success(), FanOutProgress::Pending);
        assert!(!state.is_complete());
        assert_eq!(state.record_success(), FanOutProgress::Completed);
        assert!(state.is_complete());
        assert!(state.is_settled());
        assert_eq!(state.completed(), 3);
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let mut state = FanOutState::new(4);
        assert_eq!(state.record_success(), FanOutProgress::Pending);
        assert_eq!(state.record_failure(), FanOutProgress::Failed);
        assert!(state.failed());
        assert!(!state.is_complete());
        assert_eq!(state.completed(), 2);
    }

    #[test]
    fn test_only_one_terminal_outcome_with_multiple_failures() {
        let mut state = FanOutState::new(3);
        let outcomes = [
            state.record_failure(),
            state.record_failure(),
            state.record_success(),
        ];

        let terminal = outcomes
            .iter()
            .filter(|p| matches!(p, FanOutProgress::Completed | FanOutProgress::Failed))
            .count();
        assert_eq!(terminal, 1);
        assert_eq!(outcomes[0], FanOutProgress::Failed);
        assert_eq!(outcomes[1], FanOutProgress::Settled);
        assert_eq!(outcomes[2], FanOutProgress::Settled);
    }

    #[test]
    fn test_completed_is_monotonic_and_bounded() {
        let mut state = FanOutState::new(2);
        let mut last = state.completed();
        for _ in 0..5 {
            state.record_success();
            assert!(state.completed() >= last);
            assert!(state.completed() <= state.total());
            last = state.completed();
        }
        assert_eq!(state.completed(), 2);
    }

    #[test]
    fn test_zero_total_starts_settled_and_complete() {
        let mut state = FanOutState::new(0);
        assert!(state.is_complete());
        assert!(state.is_settled());
        assert_eq!(state.record_success(), FanOutProgress::Settled);
        assert_eq!(state.completed(), 0);
    }
}
