//! Chat webhook notifier.
//!
//! Delivers the batch report as a plain-text chat message to a webhook
//! endpoint (Feishu-style `msg_type: text` payload). Message assembly is a
//! pure function so the wording is testable without a network.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::json;
use tracing::info;

use crate::domain::errors::{NotifyError, NotifyResult};
use crate::domain::models::BatchResult;
use crate::domain::ports::{FailingTrialReport, Notifier};

pub struct WebhookNotifier {
    http: ReqwestClient,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build webhook HTTP client")?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn post_text(&self, text: &str) -> NotifyResult<()> {
        let payload = json!({
            "msg_type": "text",
            "content": { "text": text },
        });
        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Assemble the report text from the batch counters and the failing-trial
/// projections.
pub fn build_report_text(result: &BatchResult, failing: &[FailingTrialReport]) -> String {
    let mut text = format!(
        "CI stability report\nTotal trials: {}\nPassed: {}\nFailed: {}\n",
        result.total(),
        result.passed(),
        result.failed()
    );

    if !failing.is_empty() {
        text.push_str("\nFailing trials:\n");
        for trial in failing {
            text.push_str(&format!(
                "- PR #{} ({}): {}\n",
                trial.number, trial.branch, trial.url
            ));
            if trial.failures.is_empty() {
                text.push_str("    checks timed out or never completed\n");
            }
            for failure in &trial.failures {
                text.push_str(&format!("    failed: {}\n", failure.name));
                if let Some(description) = &failure.description {
                    text.push_str(&format!("      {description}\n"));
                }
                if let Some(url) = &failure.detail_url {
                    text.push_str(&format!("      {url}\n"));
                }
            }
        }
    }

    text
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn report_batch(
        &self,
        result: &BatchResult,
        failing: &[FailingTrialReport],
    ) -> NotifyResult<()> {
        let text = build_report_text(result, failing);
        self.post_text(&text).await?;
        info!(
            total = result.total(),
            failed = result.failed(),
            "batch report delivered"
        );
        Ok(())
    }

    async fn report_error(&self, message: &str) -> NotifyResult<()> {
        self.post_text(&format!("CI stability run error\n{message}"))
            .await
    }
}
