//! Status polling with bounded retry and exponential backoff.
//!
//! The backoff schedule is a pure function of the attempt number so the
//! policy can be tested without waiting; the poller owns the sleeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::models::{RetryConfig, TrialStatus};
use crate::domain::ports::HostingClient;

/// Retry schedule for transient hosting-API failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.initial_backoff_secs),
            Duration::from_secs(config.max_backoff_secs),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to sleep after the given zero-based failed attempt.
    ///
    /// Doubles each time, capped at the configured ceiling.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Drives one round of status retrieval for a trial.
///
/// `poll` never fails: transient errors are retried per the policy, and both
/// retry exhaustion and permanent errors degrade to the sentinel unknown
/// snapshot. The caller treats unknown as "not complete, not passed" and
/// polls again on the next round, so a flaky API window costs accuracy for
/// one round, never a trial verdict.
pub struct TrialPoller<H: HostingClient> {
    client: Arc<H>,
    policy: RetryPolicy,
}

impl<H: HostingClient> TrialPoller<H> {
    pub fn new(client: Arc<H>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub async fn poll(&self, number: u64) -> TrialStatus {
        for attempt in 0..self.policy.max_attempts() {
            match self.client.fetch_trial_status(number).await {
                Ok(status) => {
                    if attempt > 0 {
                        debug!(pull = number, attempt, "status fetch recovered");
                    }
                    return status;
                }
                Err(err) if !err.is_transient() => {
                    warn!(pull = number, error = %err, "permanent status fetch failure");
                    return TrialStatus::unknown();
                }
                Err(err) => {
                    let remaining = self.policy.max_attempts() - attempt - 1;
                    if remaining == 0 {
                        warn!(
                            pull = number,
                            error = %err,
                            attempts = self.policy.max_attempts(),
                            "status fetch retries exhausted"
                        );
                        break;
                    }
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        pull = number,
                        error = %err,
                        retry_in_secs = delay.as_secs(),
                        "transient status fetch failure, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
        TrialStatus::unknown()
    }
}
