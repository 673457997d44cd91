//! Trial domain model.
//!
//! A trial is one pull request opened purely to trigger a CI run and observe
//! whether the suite comes back green. A batch is the set of trials created
//! and monitored in one execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::check::Check;

/// Hosting-side state of a trial's pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullState {
    Open,
    /// Closed without being merged
    Closed,
    Merged,
    /// Status could not be fetched; treated as "keep polling", never as a
    /// terminal signal
    Unknown,
}

impl PullState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
            Self::Unknown => "unknown",
        }
    }
}

/// Snapshot of one trial at one point in time.
///
/// Constructed fresh on every poll and never mutated in place. Insertion
/// order of `checks` is check-run checks first, then legacy checks; nothing
/// downstream depends on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatus {
    pub state: PullState,
    pub merged: bool,
    pub checks: Vec<Check>,
}

impl TrialStatus {
    pub fn new(state: PullState, merged: bool, checks: Vec<Check>) -> Self {
        Self {
            state,
            merged,
            checks,
        }
    }

    /// Sentinel returned when the status fetch failed outright.
    ///
    /// Callers must treat this as "not complete, not passed" and keep
    /// polling until the batch timeout.
    pub fn unknown() -> Self {
        Self {
            state: PullState::Unknown,
            merged: false,
            checks: Vec::new(),
        }
    }
}

/// Terminal verdict of a trial. Once assigned, never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    Pending,
    Passed,
    Failed,
}

impl Default for TrialOutcome {
    fn default() -> Self {
        Self::Pending
    }
}

impl TrialOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Bounded projection of one failing relevant check, carried into reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

impl From<&Check> for CheckFailure {
    fn from(check: &Check) -> Self {
        Self {
            name: check.name.clone(),
            description: check.description.clone(),
            detail_url: check.detail_url.clone(),
        }
    }
}

/// One unit of the stability batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Hosting-assigned pull request number, immutable after creation
    pub number: u64,
    /// Generated once at creation; unique within the batch
    pub branch: String,
    pub created_at: DateTime<Utc>,
    /// Mutated exactly once, when the evaluator reports completion
    pub outcome: TrialOutcome,
    /// Failing relevant checks captured at the moment the outcome froze.
    /// Empty for passed trials and for trials failed by timeout.
    pub failing_checks: Vec<CheckFailure>,
}

impl Trial {
    pub fn new(number: u64, branch: impl Into<String>) -> Self {
        Self {
            number,
            branch: branch.into(),
            created_at: Utc::now(),
            outcome: TrialOutcome::Pending,
            failing_checks: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_terminal()
    }
}

/// Outcome of one batch run.
///
/// Counters are always derived from the trial outcomes, never stored
/// redundantly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub trials: Vec<Trial>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchResult {
    pub fn new(trials: Vec<Trial>, started_at: DateTime<Utc>) -> Self {
        Self {
            trials,
            started_at: Some(started_at),
            finished_at: Some(Utc::now()),
        }
    }

    pub fn total(&self) -> usize {
        self.trials.len()
    }

    pub fn passed(&self) -> usize {
        self.trials
            .iter()
            .filter(|t| t.outcome == TrialOutcome::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.trials
            .iter()
            .filter(|t| t.outcome == TrialOutcome::Failed)
            .count()
    }

    pub fn failing_trials(&self) -> impl Iterator<Item = &Trial> {
        self.trials
            .iter()
            .filter(|t| t.outcome == TrialOutcome::Failed)
    }
}
