//! Notification collaborator contract.

use async_trait::async_trait;

use crate::domain::errors::NotifyResult;
use crate::domain::models::{BatchResult, CheckFailure};

/// Report entry for one failing trial.
#[derive(Debug, Clone)]
pub struct FailingTrialReport {
    pub number: u64,
    pub branch: String,
    pub url: String,
    /// Bounded projection of the trial's failing relevant checks.
    /// Empty when the trial failed by timeout.
    pub failures: Vec<CheckFailure>,
}

/// Delivers batch summaries and error alerts.
///
/// Delivery channel and message formatting are entirely the implementation's
/// concern; the core only supplies structured data.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn report_batch(
        &self,
        result: &BatchResult,
        failing: &[FailingTrialReport],
    ) -> NotifyResult<()>;

    async fn report_error(&self, message: &str) -> NotifyResult<()>;
}

/// A no-op notifier that delivers nothing.
///
/// Use this when notifications are disabled or not configured.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

impl NullNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NullNotifier {
    async fn report_batch(
        &self,
        _result: &BatchResult,
        _failing: &[FailingTrialReport],
    ) -> NotifyResult<()> {
        Ok(())
    }

    async fn report_error(&self, _message: &str) -> NotifyResult<()> {
        Ok(())
    }
}
