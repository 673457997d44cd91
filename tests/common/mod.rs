//! Common test utilities for integration tests
//!
//! Provides a scriptable hosting client and a recording notifier so
//! orchestrator scenarios run without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use pulsecheck::domain::errors::{HostingError, HostingResult, NotifyResult};
use pulsecheck::domain::models::{BatchResult, TrialStatus};
use pulsecheck::domain::ports::{FailingTrialReport, HostingClient, Notifier};

/// One scripted answer to a status fetch.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Status(TrialStatus),
    TransientError,
    PermanentError,
}

/// Hosting client driven by per-PR scripts.
///
/// Each `fetch_trial_status` call consumes the next step of that PR's
/// script; the final step repeats once the script is exhausted. PR numbers
/// are assigned sequentially from 101 on creation. Every call is recorded
/// for assertions.
pub struct ScriptedHosting {
    scripts: Mutex<HashMap<u64, Vec<ScriptStep>>>,
    cursors: Mutex<HashMap<u64, usize>>,
    next_number: AtomicU64,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedHosting {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            cursors: Mutex::new(HashMap::new()),
            next_number: AtomicU64::new(101),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the status sequence for a PR number (creation assigns 101,
    /// 102, ... in order).
    pub fn script(&self, number: u64, steps: Vec<ScriptStep>) {
        self.scripts.lock().unwrap().insert(number, steps);
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, number: u64) -> usize {
        let needle = format!("fetch_status:{number}");
        self.recorded_calls().iter().filter(|c| **c == needle).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HostingClient for ScriptedHosting {
    async fn base_branch_head(&self) -> HostingResult<String> {
        self.record("base_branch_head".to_string());
        Ok("a1b2c3d4".to_string())
    }

    async fn create_branch(&self, name: &str, _base_sha: &str) -> HostingResult<()> {
        self.record(format!("create_branch:{name}"));
        Ok(())
    }

    async fn fetch_file(&self, path: &str, _git_ref: &str) -> HostingResult<String> {
        self.record(format!("fetch_file:{path}"));
        Ok("all: build\n".to_string())
    }

    async fn commit_file_update(
        &self,
        path: &str,
        _content: &str,
        branch: &str,
        _message: &str,
    ) -> HostingResult<()> {
        self.record(format!("commit:{path}:{branch}"));
        Ok(())
    }

    async fn open_pull_request(
        &self,
        _head_branch: &str,
        _title: &str,
        _body: &str,
    ) -> HostingResult<u64> {
        let number = self.next_number.fetch_add(1, Ordering::SeqCst);
        self.record(format!("open_pull:{number}"));
        Ok(number)
    }

    async fn add_comment(&self, number: u64, text: &str) -> HostingResult<()> {
        self.record(format!("comment:{number}:{text}"));
        Ok(())
    }

    async fn close_pull_request(&self, number: u64) -> HostingResult<()> {
        self.record(format!("close:{number}"));
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> HostingResult<()> {
        self.record(format!("delete_branch:{name}"));
        Ok(())
    }

    async fn fetch_trial_status(&self, number: u64) -> HostingResult<TrialStatus> {
        self.record(format!("fetch_status:{number}"));

        let step = {
            let scripts = self.scripts.lock().unwrap();
            let steps = scripts
                .get(&number)
                .unwrap_or_else(|| panic!("no script for PR #{number}"));
            let mut cursors = self.cursors.lock().unwrap();
            let cursor = cursors.entry(number).or_insert(0);
            let step = steps
                .get(*cursor)
                .or_else(|| steps.last())
                .expect("script must not be empty")
                .clone();
            *cursor += 1;
            step
        };

        match step {
            ScriptStep::Status(status) => Ok(status),
            ScriptStep::TransientError => Err(HostingError::Network("connection reset".into())),
            ScriptStep::PermanentError => Err(HostingError::Auth("token revoked".into())),
        }
    }

    fn pull_request_url(&self, number: u64) -> String {
        format!("https://github.com/acme/widget/pull/{number}")
    }
}

/// Notifier that records what it was asked to deliver.
#[derive(Default)]
pub struct RecordingNotifier {
    pub batches: Mutex<Vec<(usize, usize, usize, Vec<FailingTrialReport>)>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn report_batch(
        &self,
        result: &BatchResult,
        failing: &[FailingTrialReport],
    ) -> NotifyResult<()> {
        self.batches.lock().unwrap().push((
            result.total(),
            result.passed(),
            result.failed(),
            failing.to_vec(),
        ));
        Ok(())
    }

    async fn report_error(&self, message: &str) -> NotifyResult<()> {
        self.errors.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
