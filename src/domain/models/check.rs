//! Check domain model.
//!
//! A `Check` is one reported CI signal for a commit, regardless of whether it
//! arrived through the modern check-run channel or the legacy commit-status
//! channel. Both channels are normalized into this shape before any
//! completion or pass/fail decision is made.

use serde::{Deserialize, Serialize};

/// Execution state of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Check is queued but has not started
    Queued,
    /// Check is currently running
    InProgress,
    /// Check has finished; see `conclusion` for the verdict
    Completed,
    /// Check was never going to run (reporter marked it skipped up front)
    Skipped,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    /// A resolved check no longer blocks trial completion.
    ///
    /// `Skipped` counts as resolved: a check that will never run is not
    /// pending, it is simply absent from the verdict.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// Verdict of a completed check.
///
/// Only meaningful when the check's status is [`CheckStatus::Completed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Error,
    Skipped,
    Neutral,
    Cancelled,
    TimedOut,
    ActionRequired,
}

impl CheckConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Skipped => "skipped",
            Self::Neutral => "neutral",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
            Self::ActionRequired => "action_required",
        }
    }

    /// Conclusions that do not count against a trial.
    pub fn is_passing(&self) -> bool {
        matches!(self, Self::Success | Self::Skipped)
    }
}

/// Which reporting channel a check arrived through.
///
/// Provenance is kept for deduplication and debugging only; the pass/fail
/// decision never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSource {
    CheckRun,
    LegacyStatus,
}

/// One normalized CI signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Check-run name, or the legacy status "context"
    pub name: String,
    pub status: CheckStatus,
    /// Present only when `status` is `Completed`
    pub conclusion: Option<CheckConclusion>,
    pub source: CheckSource,
    /// Free-form reporter text; legacy statuses only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the reporter's own result page; legacy statuses only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

impl Check {
    /// A check sourced from the modern check-run channel.
    pub fn from_run(
        name: impl Into<String>,
        status: CheckStatus,
        conclusion: Option<CheckConclusion>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            conclusion,
            source: CheckSource::CheckRun,
            description: None,
            detail_url: None,
        }
    }

    /// A check sourced from the legacy commit-status channel.
    ///
    /// Legacy states are collapsed onto the check-run model: the terminal
    /// states `success`, `failure` and `error` become `Completed` with the
    /// matching conclusion; everything else (`pending`, unknown extensions)
    /// becomes `InProgress` with no conclusion.
    pub fn from_legacy_state(
        context: impl Into<String>,
        state: &str,
        description: Option<String>,
        detail_url: Option<String>,
    ) -> Self {
        let (status, conclusion) = match state {
            "success" => (CheckStatus::Completed, Some(CheckConclusion::Success)),
            "failure" => (CheckStatus::Completed, Some(CheckConclusion::Failure)),
            "error" => (CheckStatus::Completed, Some(CheckConclusion::Error)),
            _ => (CheckStatus::InProgress, None),
        };
        Self {
            name: context.into(),
            status,
            conclusion,
            source: CheckSource::LegacyStatus,
            description,
            detail_url,
        }
    }

    /// Whether this check has stopped changing.
    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    /// Whether this check completed with a non-passing conclusion.
    ///
    /// A completed check with no conclusion at all counts as red: the
    /// reporter finished without vouching for the commit.
    pub fn is_red(&self) -> bool {
        self.status == CheckStatus::Completed
            && !self.conclusion.is_some_and(|c| c.is_passing())
    }
}
