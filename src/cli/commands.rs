//! Command implementations.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::models::{Config, NotifyConfig};
use crate::domain::ports::{Notifier, NullNotifier};
use crate::infrastructure::github::GitHubClient;
use crate::infrastructure::notify::WebhookNotifier;
use crate::services::{DailyScheduler, RetryPolicy, StabilityOrchestrator};

use super::output;

type Orchestrator = StabilityOrchestrator<GitHubClient, dyn Notifier>;

/// Run one batch immediately and print the summary table.
pub async fn run(config: Config) -> Result<()> {
    let orchestrator = build_orchestrator(&config)?;
    let result = orchestrator.run_batch().await?;
    println!("{}", output::render_summary(&result));
    Ok(())
}

/// Run a batch every day at the configured UTC time. Never returns.
pub async fn schedule(config: Config) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(&config)?);
    let scheduler = DailyScheduler::new(config.schedule.clone());
    scheduler
        .run(move || {
            let orchestrator = Arc::clone(&orchestrator);
            async move { orchestrator.run_batch().await }
        })
        .await;
    Ok(())
}

/// Verify the configuration resolves and the hosting API answers.
pub async fn validate(config: Config) -> Result<()> {
    use crate::domain::ports::HostingClient;

    let hosting = GitHubClient::new(&config.hosting)?;
    let sha = hosting
        .base_branch_head()
        .await
        .context("hosting API connectivity check failed")?;
    info!(
        base_branch = %config.hosting.base_branch,
        head = %sha,
        "configuration OK, hosting API reachable"
    );
    println!(
        "configuration OK: {}/{} base branch {} at {}",
        config.hosting.owner, config.hosting.repo, config.hosting.base_branch, sha
    );
    Ok(())
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let hosting = Arc::new(GitHubClient::new(&config.hosting)?);
    let notifier = make_notifier(&config.notify)?;
    Ok(StabilityOrchestrator::new(
        hosting,
        notifier,
        config.trial.clone(),
        RetryPolicy::from_config(&config.retry),
    ))
}

fn make_notifier(config: &NotifyConfig) -> Result<Arc<dyn Notifier>> {
    match (config.enabled, &config.webhook_url) {
        (true, Some(url)) => Ok(Arc::new(WebhookNotifier::new(url.clone())?)),
        _ => Ok(Arc::new(NullNotifier::new())),
    }
}
