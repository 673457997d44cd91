//! Batch lifecycle orchestration.
//!
//! Owns the end-to-end run: staggered trial creation, the sequential
//! monitoring loop under the global timeout, post-completion cleanup, and
//! report assembly. Everything runs single-threaded; the only suspensions
//! are the three timed waits (creation stagger, poll interval, retry
//! backoff inside the poller).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::domain::errors::HostingResult;
use crate::domain::models::{BatchResult, Trial, TrialConfig, TrialOutcome};
use crate::domain::ports::{FailingTrialReport, HostingClient, Notifier};
use crate::services::evaluator::TrialEvaluator;
use crate::services::poller::{RetryPolicy, TrialPoller};

/// Drives one stability batch from creation to report.
pub struct StabilityOrchestrator<H: HostingClient, N: Notifier + ?Sized> {
    hosting: Arc<H>,
    notifier: Arc<N>,
    config: TrialConfig,
    poller: TrialPoller<H>,
    evaluator: TrialEvaluator,
}

impl<H: HostingClient, N: Notifier + ?Sized> StabilityOrchestrator<H, N> {
    pub fn new(
        hosting: Arc<H>,
        notifier: Arc<N>,
        config: TrialConfig,
        retry: RetryPolicy,
    ) -> Self {
        let poller = TrialPoller::new(Arc::clone(&hosting), retry);
        let evaluator = TrialEvaluator::with_prefix(config.check_prefix.clone());
        Self {
            hosting,
            notifier,
            config,
            poller,
            evaluator,
        }
    }

    /// Run one complete batch.
    ///
    /// Always produces a deterministic summary when it returns `Ok`: every
    /// created trial ends as exactly one of passed or failed. A fatal error
    /// triggers one best-effort error notification before propagating.
    pub async fn run_batch(&self) -> anyhow::Result<BatchResult> {
        info!(trials = self.config.count, "starting stability batch");

        match self.run_batch_inner().await {
            Ok(result) => {
                info!(
                    total = result.total(),
                    passed = result.passed(),
                    failed = result.failed(),
                    "stability batch finished"
                );
                Ok(result)
            }
            Err(err) => {
                error!(error = %err, "stability batch failed");
                let message = format!("stability batch failed: {err:#}");
                if let Err(notify_err) = self.notifier.report_error(&message).await {
                    warn!(error = %notify_err, "failed to deliver error notification");
                }
                Err(err)
            }
        }
    }

    async fn run_batch_inner(&self) -> anyhow::Result<BatchResult> {
        let started_at = Utc::now();

        let mut trials = self.create_trials().await;
        if trials.is_empty() {
            error!("no trials were created, reporting an empty batch");
        } else {
            info!(created = trials.len(), "all trials created, monitoring checks");
            self.monitor(&mut trials).await;
            self.cleanup(&trials).await;
        }

        let result = BatchResult::new(trials, started_at);
        let failing = self.failing_reports(&result);
        if let Err(err) = self.notifier.report_batch(&result, &failing).await {
            warn!(error = %err, "failed to deliver batch report");
        }
        Ok(result)
    }

    /// Create the batch one trial at a time with a fixed stagger.
    ///
    /// A creation failure is logged and skipped; it never aborts the batch.
    async fn create_trials(&self) -> Vec<Trial> {
        let mut trials = Vec::with_capacity(self.config.count);
        let stagger = Duration::from_secs(self.config.creation_interval_secs);

        for i in 0..self.config.count {
            info!(trial = i + 1, of = self.config.count, "creating trial");
            match self.create_single_trial().await {
                Ok(trial) => {
                    info!(pull = trial.number, branch = %trial.branch, "trial created");
                    trials.push(trial);
                }
                Err(err) => {
                    error!(trial = i + 1, error = %err, "trial creation failed, skipping");
                }
            }
            if i + 1 < self.config.count {
                debug!(secs = stagger.as_secs(), "waiting before next trial");
                sleep(stagger).await;
            }
        }

        info!(
            created = trials.len(),
            attempted = self.config.count,
            "trial creation finished"
        );
        trials
    }

    async fn create_single_trial(&self) -> HostingResult<Trial> {
        let branch = self.generate_branch_name();
        let base_sha = self.hosting.base_branch_head().await?;
        self.hosting.create_branch(&branch, &base_sha).await?;

        // The trivial change: one extra blank line at the end of the probe
        // file, enough to produce a fresh commit the CI suite must test.
        let mut content = self
            .hosting
            .fetch_file(&self.config.probe_path, &base_sha)
            .await?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');

        let now = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let message = format!("Append blank line for stability trial - {now}");
        self.hosting
            .commit_file_update(&self.config.probe_path, &content, &branch, &message)
            .await?;

        let title = format!("{} - {now}", self.config.title_prefix);
        let number = self
            .hosting
            .open_pull_request(&branch, &title, &self.config.body)
            .await?;

        for comment in &self.config.trigger_comments {
            if let Err(err) = self.hosting.add_comment(number, comment).await {
                warn!(pull = number, comment = %comment, error = %err, "failed to post trigger comment");
            } else {
                debug!(pull = number, comment = %comment, "posted trigger comment");
            }
        }

        Ok(Trial::new(number, branch))
    }

    /// Unique within the batch: title prefix, second-resolution timestamp,
    /// random lowercase suffix.
    fn generate_branch_name(&self) -> String {
        let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
        let mut rng = rand::thread_rng();
        let suffix: String = (0..6).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
        format!("{}-{timestamp}-{suffix}", self.config.title_prefix)
    }

    /// Poll every unresolved trial once per round until all are terminal or
    /// the global timeout elapses. The timeout is checked once per round,
    /// never mid-poll; trials still pending when it fires are forced to
    /// failed without a further completion check.
    async fn monitor(&self, trials: &mut [Trial]) {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let interval = Duration::from_secs(self.config.poll_interval_secs);
        let started = Instant::now();

        loop {
            if trials.iter().all(Trial::is_resolved) {
                info!("all trials resolved");
                return;
            }
            if started.elapsed() >= timeout {
                for trial in trials.iter_mut().filter(|t| !t.is_resolved()) {
                    warn!(pull = trial.number, "trial timed out, marking failed");
                    trial.outcome = TrialOutcome::Failed;
                }
                return;
            }

            for trial in trials.iter_mut().filter(|t| !t.is_resolved()) {
                let status = self.poller.poll(trial.number).await;
                if self.evaluator.is_complete(&status) {
                    if self.evaluator.is_passed(&status) {
                        info!(pull = trial.number, "trial passed");
                        trial.outcome = TrialOutcome::Passed;
                    } else {
                        trial.failing_checks = self
                            .evaluator
                            .failing_checks(&status, self.config.max_reported_failures);
                        let names: Vec<&str> = trial
                            .failing_checks
                            .iter()
                            .map(|f| f.name.as_str())
                            .collect();
                        info!(pull = trial.number, failed_checks = ?names, "trial failed");
                        trial.outcome = TrialOutcome::Failed;
                    }
                } else {
                    debug!(pull = trial.number, state = status.state.as_str(), "trial still running");
                }
            }

            if !trials.iter().all(Trial::is_resolved) {
                debug!(secs = interval.as_secs(), "waiting before next monitoring round");
                sleep(interval).await;
            }
        }
    }

    /// Close and delete passing trials; keep failing ones for manual triage.
    ///
    /// Hosting errors here downgrade the step to a no-op for that trial and
    /// never affect the batch.
    async fn cleanup(&self, trials: &[Trial]) {
        for trial in trials {
            match trial.outcome {
                TrialOutcome::Passed => {
                    info!(pull = trial.number, "cleaning up passed trial");
                    if let Err(err) = self.hosting.close_pull_request(trial.number).await {
                        warn!(pull = trial.number, error = %err, "failed to close pull request");
                        continue;
                    }
                    if let Err(err) = self.hosting.delete_branch(&trial.branch).await {
                        warn!(pull = trial.number, branch = %trial.branch, error = %err, "failed to delete branch");
                    }
                }
                TrialOutcome::Failed => {
                    info!(pull = trial.number, "keeping failed trial open for review");
                }
                TrialOutcome::Pending => {
                    // Monitoring guarantees no trial leaves as pending.
                    warn!(pull = trial.number, "trial left pending, skipping cleanup");
                }
            }
        }
    }

    fn failing_reports(&self, result: &BatchResult) -> Vec<FailingTrialReport> {
        result
            .failing_trials()
            .map(|trial| FailingTrialReport {
                number: trial.number,
                branch: trial.branch.clone(),
                url: self.hosting.pull_request_url(trial.number),
                failures: trial.failing_checks.clone(),
            })
            .collect()
    }
}
