//! End-to-end orchestrator scenarios against a scripted hosting client.
//!
//! Time is paused: the stagger, poll-interval and backoff sleeps all
//! auto-advance, so multi-hour schedules run in milliseconds.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingNotifier, ScriptStep, ScriptedHosting};
use pulsecheck::domain::models::{
    Check, CheckConclusion, CheckStatus, PullState, TrialConfig, TrialOutcome, TrialStatus,
};
use pulsecheck::services::{RetryPolicy, StabilityOrchestrator};

fn test_config(count: usize) -> TrialConfig {
    TrialConfig {
        count,
        creation_interval_secs: 60,
        poll_interval_secs: 300,
        timeout_secs: 7200,
        trigger_comments: vec!["/test pull-unit".to_string()],
        ..TrialConfig::default()
    }
}

fn policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_secs(5), Duration::from_secs(300))
}

fn open_with(checks: Vec<Check>) -> ScriptStep {
    ScriptStep::Status(TrialStatus::new(PullState::Open, false, checks))
}

fn merged() -> ScriptStep {
    ScriptStep::Status(TrialStatus::new(PullState::Merged, true, Vec::new()))
}

fn orchestrator(
    hosting: &Arc<ScriptedHosting>,
    notifier: &Arc<RecordingNotifier>,
    config: TrialConfig,
) -> StabilityOrchestrator<ScriptedHosting, RecordingNotifier> {
    StabilityOrchestrator::new(Arc::clone(hosting), Arc::clone(notifier), config, policy())
}

/// Scenario A: one trial merges mid-run, the other fails a relevant check.
#[tokio::test(start_paused = true)]
async fn mixed_batch_reports_one_passed_one_failed() {
    let hosting = Arc::new(ScriptedHosting::new());
    let notifier = Arc::new(RecordingNotifier::new());

    // Trial 101: no signal on round 1, merged on round 2.
    hosting.script(101, vec![open_with(vec![]), merged()]);
    // Trial 102: no signal, then running, then a red relevant check.
    hosting.script(
        102,
        vec![
            open_with(vec![]),
            open_with(vec![Check::from_run(
                "pull-integration",
                CheckStatus::InProgress,
                None,
            )]),
            open_with(vec![Check::from_legacy_state(
                "pull-integration",
                "failure",
                Some("2 cases failed".to_string()),
                Some("https://prow.example.com/runs/88".to_string()),
            )]),
        ],
    );

    let result = orchestrator(&hosting, &notifier, test_config(2))
        .run_batch()
        .await
        .unwrap();

    assert_eq!(result.total(), 2);
    assert_eq!(result.passed(), 1);
    assert_eq!(result.failed(), 1);
    assert_eq!(result.trials[0].outcome, TrialOutcome::Passed);
    assert_eq!(result.trials[1].outcome, TrialOutcome::Failed);

    let calls = hosting.recorded_calls();

    // Passing trial is cleaned up (close on an already-merged PR is a
    // tolerated no-op on the hosting side); failing trial is retained.
    assert!(calls.iter().any(|c| c == "close:101"));
    assert!(!calls.iter().any(|c| c == "close:102"));
    assert_eq!(
        calls.iter().filter(|c| c.starts_with("delete_branch:")).count(),
        1
    );

    // Trigger comments were posted on both PRs.
    assert!(calls.iter().any(|c| c == "comment:101:/test pull-unit"));
    assert!(calls.iter().any(|c| c == "comment:102:/test pull-unit"));

    // The report carries the failing trial with its check projection.
    let batches = notifier.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let (total, passed, failed, failing) = &batches[0];
    assert_eq!((*total, *passed, *failed), (2, 1, 1));
    assert_eq!(failing.len(), 1);
    assert_eq!(failing[0].number, 102);
    assert_eq!(failing[0].failures[0].name, "pull-integration");
    assert_eq!(
        failing[0].failures[0].description.as_deref(),
        Some("2 cases failed")
    );
    assert!(failing[0].url.ends_with("/pull/102"));
}

/// Scenario B: three consecutive transient fetch failures degrade one round
/// to an unknown snapshot; the trial stays pending and resolves next round.
#[tokio::test(start_paused = true)]
async fn transient_fetch_failures_do_not_fail_the_trial() {
    let hosting = Arc::new(ScriptedHosting::new());
    let notifier = Arc::new(RecordingNotifier::new());

    hosting.script(
        101,
        vec![
            ScriptStep::TransientError,
            ScriptStep::TransientError,
            ScriptStep::TransientError,
            merged(),
        ],
    );

    let result = orchestrator(&hosting, &notifier, test_config(1))
        .run_batch()
        .await
        .unwrap();

    assert_eq!(result.trials[0].outcome, TrialOutcome::Passed);
    // Round 1 burned the full retry budget, round 2 succeeded first try.
    assert_eq!(hosting.fetch_count(101), 4);
}

/// A permanent error is not worth a retry; it degrades to unknown at once.
#[tokio::test(start_paused = true)]
async fn permanent_fetch_failure_degrades_without_retries() {
    let hosting = Arc::new(ScriptedHosting::new());
    let notifier = Arc::new(RecordingNotifier::new());

    hosting.script(
        101,
        vec![
            ScriptStep::PermanentError,
            open_with(vec![Check::from_run(
                "pull-unit",
                CheckStatus::Completed,
                Some(CheckConclusion::Success),
            )]),
        ],
    );

    let result = orchestrator(&hosting, &notifier, test_config(1))
        .run_batch()
        .await
        .unwrap();

    assert_eq!(result.trials[0].outcome, TrialOutcome::Passed);
    assert_eq!(hosting.fetch_count(101), 2);
}

/// Timeout law: a trial that never resolves is forced to failed, never left
/// pending, once the global budget elapses.
#[tokio::test(start_paused = true)]
async fn global_timeout_forces_unresolved_trials_to_failed() {
    let hosting = Arc::new(ScriptedHosting::new());
    let notifier = Arc::new(RecordingNotifier::new());

    hosting.script(
        101,
        vec![open_with(vec![Check::from_run(
            "pull-unit",
            CheckStatus::InProgress,
            None,
        )])],
    );

    let mut config = test_config(1);
    config.timeout_secs = 1000;

    let result = orchestrator(&hosting, &notifier, config)
        .run_batch()
        .await
        .unwrap();

    assert_eq!(result.trials[0].outcome, TrialOutcome::Failed);
    assert!(result.trials[0].failing_checks.is_empty());
    assert_eq!((result.total(), result.passed(), result.failed()), (1, 0, 1));

    // Timed-out trials are kept for triage, not cleaned up.
    let calls = hosting.recorded_calls();
    assert!(!calls.iter().any(|c| c.starts_with("close:")));
}

/// A red check fails the trial even while other relevant checks still run:
/// completion waits, but the verdict is already sealed once complete.
#[tokio::test(start_paused = true)]
async fn trial_completes_only_when_every_relevant_check_resolves() {
    let hosting = Arc::new(ScriptedHosting::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let red = Check::from_run(
        "pull-unit",
        CheckStatus::Completed,
        Some(CheckConclusion::Failure),
    );
    let running = Check::from_run("pull-e2e", CheckStatus::InProgress, None);
    let finished = Check::from_run("pull-e2e", CheckStatus::Completed, Some(CheckConclusion::Success));

    hosting.script(
        101,
        vec![
            open_with(vec![red.clone(), running]),
            open_with(vec![red, finished]),
        ],
    );

    let result = orchestrator(&hosting, &notifier, test_config(1))
        .run_batch()
        .await
        .unwrap();

    assert_eq!(result.trials[0].outcome, TrialOutcome::Failed);
    // Two rounds: the first was incomplete despite the red check.
    assert_eq!(hosting.fetch_count(101), 2);
    assert_eq!(result.trials[0].failing_checks.len(), 1);
    assert_eq!(result.trials[0].failing_checks[0].name, "pull-unit");
}
