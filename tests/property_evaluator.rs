//! Property-based tests for the completion/outcome evaluator.

use proptest::prelude::*;

use pulsecheck::domain::models::{
    Check, CheckConclusion, CheckStatus, PullState, TrialStatus,
};
use pulsecheck::services::TrialEvaluator;

fn check_status() -> impl Strategy<Value = CheckStatus> {
    prop_oneof![
        Just(CheckStatus::Queued),
        Just(CheckStatus::InProgress),
        Just(CheckStatus::Completed),
        Just(CheckStatus::Skipped),
    ]
}

fn check_conclusion() -> impl Strategy<Value = Option<CheckConclusion>> {
    prop_oneof![
        Just(None),
        Just(Some(CheckConclusion::Success)),
        Just(Some(CheckConclusion::Failure)),
        Just(Some(CheckConclusion::Error)),
        Just(Some(CheckConclusion::Skipped)),
        Just(Some(CheckConclusion::Neutral)),
        Just(Some(CheckConclusion::Cancelled)),
        Just(Some(CheckConclusion::TimedOut)),
        Just(Some(CheckConclusion::ActionRequired)),
    ]
}

fn check_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pull-unit".to_string()),
        Just("pull-e2e".to_string()),
        Just("pull-lint".to_string()),
        Just("other-build".to_string()),
        Just("docs".to_string()),
    ]
}

fn check() -> impl Strategy<Value = Check> {
    (check_name(), check_status(), check_conclusion())
        .prop_map(|(name, status, conclusion)| Check::from_run(name, status, conclusion))
}

fn checks() -> impl Strategy<Value = Vec<Check>> {
    prop::collection::vec(check(), 0..8)
}

proptest! {
    /// Closed and merged override CI signal entirely.
    #[test]
    fn resolved_pull_state_is_always_complete(checks in checks()) {
        let eval = TrialEvaluator::with_prefix("pull-");
        let closed = TrialStatus::new(PullState::Closed, false, checks.clone());
        let merged = TrialStatus::new(PullState::Merged, true, checks);
        prop_assert!(eval.is_complete(&closed));
        prop_assert!(eval.is_complete(&merged));
        prop_assert!(!eval.is_passed(&closed));
        prop_assert!(eval.is_passed(&merged));
    }

    /// Re-evaluating the same immutable snapshot never changes the answer.
    #[test]
    fn evaluation_is_pure(checks in checks()) {
        let eval = TrialEvaluator::with_prefix("pull-");
        let status = TrialStatus::new(PullState::Open, false, checks);
        prop_assert_eq!(eval.is_complete(&status), eval.is_complete(&status));
        prop_assert_eq!(eval.is_passed(&status), eval.is_passed(&status));
    }

    /// One red relevant check sinks the trial no matter what else reported.
    #[test]
    fn any_red_relevant_check_fails(mut checks in checks(), position in 0usize..8) {
        let red = Check::from_run(
            "pull-poisoned",
            CheckStatus::Completed,
            Some(CheckConclusion::Failure),
        );
        let at = position.min(checks.len());
        checks.insert(at, red);

        let eval = TrialEvaluator::with_prefix("pull-");
        let status = TrialStatus::new(PullState::Open, false, checks);
        prop_assert!(!eval.is_passed(&status));
    }

    /// Without relevant signal an open trial is neither complete nor passed.
    #[test]
    fn no_relevant_signal_is_no_answer(count in 0usize..6) {
        let checks: Vec<Check> = (0..count)
            .map(|i| {
                Check::from_run(
                    format!("other-{i}"),
                    CheckStatus::Completed,
                    Some(CheckConclusion::Success),
                )
            })
            .collect();

        let eval = TrialEvaluator::with_prefix("pull-");
        let status = TrialStatus::new(PullState::Open, false, checks);
        prop_assert!(!eval.is_complete(&status));
        prop_assert!(!eval.is_passed(&status));
    }

    /// Completion requires every relevant check resolved, and a complete
    /// all-green set passes.
    #[test]
    fn all_resolved_green_set_completes_and_passes(count in 1usize..6) {
        let checks: Vec<Check> = (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    Check::from_run(
                        format!("pull-{i}"),
                        CheckStatus::Completed,
                        Some(CheckConclusion::Success),
                    )
                } else {
                    Check::from_run(format!("pull-{i}"), CheckStatus::Skipped, None)
                }
            })
            .collect();

        let eval = TrialEvaluator::with_prefix("pull-");
        let status = TrialStatus::new(PullState::Open, false, checks);
        prop_assert!(eval.is_complete(&status));
        prop_assert!(eval.is_passed(&status));
    }
}
