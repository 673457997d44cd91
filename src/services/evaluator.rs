//! Completion and outcome evaluation for trials.
//!
//! Two separate questions are asked of every status snapshot: "is this trial
//! complete?" and "did it pass?". They stay separate because a caller polling
//! under a timeout needs to distinguish "still running" from "finished but
//! red", and because a closed or merged PR is an authoritative override that
//! short-circuits CI signal entirely.
//!
//! Everything here is pure: same snapshot in, same answers out.

use crate::domain::models::{Check, CheckFailure, PullState, TrialStatus};

/// Selects the checks that belong to the trial's CI suite.
///
/// Membership is a name-prefix convention (e.g. `pull-`), supplied by
/// configuration. Only relevant checks affect completion and pass decisions.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    prefix: String,
}

impl RelevanceFilter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The relevant subset of `checks`, order preserved.
    pub fn relevant<'a>(&self, checks: &'a [Check]) -> Vec<&'a Check> {
        checks
            .iter()
            .filter(|c| c.name.starts_with(&self.prefix))
            .collect()
    }
}

/// Pure decision logic over a trial's current status snapshot.
#[derive(Debug, Clone)]
pub struct TrialEvaluator {
    filter: RelevanceFilter,
}

impl TrialEvaluator {
    pub fn new(filter: RelevanceFilter) -> Self {
        Self { filter }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(RelevanceFilter::new(prefix))
    }

    pub fn filter(&self) -> &RelevanceFilter {
        &self.filter
    }

    /// Whether the trial has stopped needing polls.
    ///
    /// A closed or merged PR is complete no matter what its checks say.
    /// An open PR with no relevant checks is not complete: absence of CI
    /// signal is absence of an answer, not an answer.
    pub fn is_complete(&self, status: &TrialStatus) -> bool {
        match status.state {
            PullState::Closed | PullState::Merged => true,
            PullState::Open | PullState::Unknown => {
                let relevant = self.filter.relevant(&status.checks);
                !relevant.is_empty() && relevant.iter().all(|c| c.is_resolved())
            }
        }
    }

    /// Whether the trial's relevant checks came back green.
    ///
    /// Meaningful once `is_complete` holds, but makes no assumption of it:
    /// checks that have not completed yet are simply ignored here, since
    /// completeness is the other question.
    pub fn is_passed(&self, status: &TrialStatus) -> bool {
        match status.state {
            PullState::Merged => true,
            PullState::Closed => false,
            PullState::Open | PullState::Unknown => {
                let relevant = self.filter.relevant(&status.checks);
                !relevant.is_empty() && !relevant.iter().any(|c| c.is_red())
            }
        }
    }

    /// Bounded projection of the relevant checks that are red, for reports.
    pub fn failing_checks(&self, status: &TrialStatus, limit: usize) -> Vec<CheckFailure> {
        self.filter
            .relevant(&status.checks)
            .into_iter()
            .filter(|c| c.is_red())
            .take(limit)
            .map(CheckFailure::from)
            .collect()
    }
}
