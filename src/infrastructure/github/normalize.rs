//! Check normalization.
//!
//! GitHub reports CI signal through two structurally different channels: the
//! check-runs API (GitHub Actions and apps) and the legacy commit-status API
//! (Prow, Jenkins, external reporters). This module folds both into the one
//! [`Check`] shape the evaluator understands.

use std::collections::HashSet;

use crate::domain::models::{Check, CheckConclusion, CheckStatus};

use super::types::{CheckRunWire, CommitStatusWire};

/// Normalize both channels into one check sequence: check-run checks first,
/// then legacy checks.
///
/// Legacy entries are deduplicated by context, first seen wins — the
/// statuses API returns newest first, so the first occurrence is the
/// current verdict for that context. Check-run entries are never
/// deduplicated: the two channels are independent and may legitimately
/// share names.
pub fn normalize_checks(runs: &[CheckRunWire], statuses: &[CommitStatusWire]) -> Vec<Check> {
    let mut checks: Vec<Check> = runs
        .iter()
        .map(|run| {
            Check::from_run(
                run.name.clone(),
                parse_run_status(&run.status),
                run.conclusion.as_deref().and_then(parse_run_conclusion),
            )
        })
        .collect();

    let mut seen = HashSet::new();
    for status in statuses {
        if !seen.insert(status.context.as_str()) {
            continue;
        }
        checks.push(Check::from_legacy_state(
            status.context.clone(),
            &status.state,
            status.description.clone(),
            status.target_url.clone(),
        ));
    }

    checks
}

fn parse_run_status(status: &str) -> CheckStatus {
    match status {
        "queued" => CheckStatus::Queued,
        "completed" => CheckStatus::Completed,
        "skipped" => CheckStatus::Skipped,
        // in_progress, waiting, requested, pending, anything new
        _ => CheckStatus::InProgress,
    }
}

fn parse_run_conclusion(conclusion: &str) -> Option<CheckConclusion> {
    match conclusion {
        "success" => Some(CheckConclusion::Success),
        "failure" => Some(CheckConclusion::Failure),
        "error" => Some(CheckConclusion::Error),
        "skipped" => Some(CheckConclusion::Skipped),
        "neutral" => Some(CheckConclusion::Neutral),
        "cancelled" => Some(CheckConclusion::Cancelled),
        "timed_out" => Some(CheckConclusion::TimedOut),
        "action_required" => Some(CheckConclusion::ActionRequired),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CheckSource;

    fn run(name: &str, status: &str, conclusion: Option<&str>) -> CheckRunWire {
        CheckRunWire {
            name: name.to_string(),
            status: status.to_string(),
            conclusion: conclusion.map(str::to_string),
        }
    }

    fn legacy(context: &str, state: &str) -> CommitStatusWire {
        CommitStatusWire {
            context: context.to_string(),
            state: state.to_string(),
            description: None,
            target_url: None,
        }
    }

    #[test]
    fn empty_inputs_yield_empty_sequence() {
        assert!(normalize_checks(&[], &[]).is_empty());
    }

    #[test]
    fn check_runs_come_before_legacy_checks() {
        let checks = normalize_checks(
            &[run("pull-unit", "completed", Some("success"))],
            &[legacy("pull-integration", "pending")],
        );
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].source, CheckSource::CheckRun);
        assert_eq!(checks[1].source, CheckSource::LegacyStatus);
    }

    #[test]
    fn legacy_duplicates_keep_first_seen_only() {
        // Statuses arrive newest first; a re-reported context must keep its
        // newest entry and drop the stale one.
        let checks = normalize_checks(
            &[],
            &[
                legacy("pull-unit", "failure"),
                legacy("pull-unit", "success"),
            ],
        );
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, CheckStatus::Completed);
        assert_eq!(checks[0].conclusion, Some(CheckConclusion::Failure));
    }

    #[test]
    fn check_runs_are_never_deduplicated() {
        let checks = normalize_checks(
            &[
                run("pull-unit", "completed", Some("success")),
                run("pull-unit", "completed", Some("failure")),
            ],
            &[legacy("pull-unit", "pending")],
        );
        // Same name across and within channels, all three survive.
        assert_eq!(checks.len(), 3);
    }

    #[test]
    fn unknown_run_status_maps_to_in_progress() {
        let checks = normalize_checks(&[run("pull-unit", "waiting", None)], &[]);
        assert_eq!(checks[0].status, CheckStatus::InProgress);
    }

    #[test]
    fn unrecognized_conclusion_degrades_to_none() {
        let checks = normalize_checks(&[run("pull-unit", "completed", Some("stale"))], &[]);
        // Unrecognized conclusion string degrades to none, which the
        // evaluator treats as red for a completed check.
        assert_eq!(checks[0].conclusion, None);
    }

    #[test]
    fn legacy_description_and_url_are_carried() {
        let status = CommitStatusWire {
            context: "pull-e2e".to_string(),
            state: "failure".to_string(),
            description: Some("3 cases failed".to_string()),
            target_url: Some("https://prow.example.com/123".to_string()),
        };
        let checks = normalize_checks(&[], &[status]);
        assert_eq!(checks[0].description.as_deref(), Some("3 cases failed"));
        assert_eq!(
            checks[0].detail_url.as_deref(),
            Some("https://prow.example.com/123")
        );
    }
}
