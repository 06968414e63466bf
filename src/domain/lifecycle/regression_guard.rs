//! RegressionGuard - terminal states are a one-way gate.

use super::state::LifecycleState;
use crate::domain::foundation::StateMachine;

pub struct RegressionGuard;

impl RegressionGuard {
    /// Final state given a known prior resolution.
    ///
    /// A terminal prior is returned unchanged whatever the candidate says.
    /// Without a prior the candidate passes through.
    pub fn apply(prior: Option<LifecycleState>, candidate: LifecycleState) -> LifecycleState {
        match prior {
            Some(prior) if prior.is_terminal() => prior,
            _ => candidate,
        }
    }

    /// True when applying the guard replaced the candidate.
    pub fn holds(prior: Option<LifecycleState>, candidate: LifecycleState) -> bool {
        Self::apply(prior, candidate) != candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = LifecycleState> {
        prop::sample::select(LifecycleState::ALL.to_vec())
    }

    #[test]
    fn no_prior_passes_candidate_through() {
        assert_eq!(
            RegressionGuard::apply(None, LifecycleState::Assigned),
            LifecycleState::Assigned
        );
    }

    #[test]
    fn completed_prior_holds_against_any_candidate() {
        for candidate in LifecycleState::ALL {
            assert_eq!(
                RegressionGuard::apply(Some(LifecycleState::Completed), candidate),
                LifecycleState::Completed
            );
        }
    }

    #[test]
    fn closed_prior_is_not_upgraded_to_completed() {
        assert_eq!(
            RegressionGuard::apply(Some(LifecycleState::Closed), LifecycleState::Completed),
            LifecycleState::Closed
        );
    }

    #[test]
    fn non_terminal_prior_does_not_block_movement() {
        assert_eq!(
            RegressionGuard::apply(Some(LifecycleState::Submitted), LifecycleState::UnderReview),
            LifecycleState::UnderReview
        );
        assert!(!RegressionGuard::holds(
            Some(LifecycleState::Assigned),
            LifecycleState::Submitted
        ));
    }

    proptest! {
        #[test]
        fn terminal_prior_always_wins(candidate in any_state(), closed in any::<bool>()) {
            let prior = if closed { LifecycleState::Closed } else { LifecycleState::Completed };
            prop_assert_eq!(RegressionGuard::apply(Some(prior), candidate), prior);
        }

        #[test]
        fn guard_is_idempotent(prior in any_state(), candidate in any_state()) {
            let once = RegressionGuard::apply(Some(prior), candidate);
            prop_assert_eq!(RegressionGuard::apply(Some(prior), once), once);
        }
    }
}
