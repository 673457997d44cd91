//! Configuration model.
//!
//! Constructed once at startup by the loader and passed by reference into
//! the orchestrator and the collaborators. Nothing in the decision logic
//! looks configuration up ambiently.

use serde::{Deserialize, Serialize};

/// Main configuration structure for pulsecheck.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Hosting API coordinates and credentials
    #[serde(default)]
    pub hosting: HostingConfig,

    /// Trial batch parameters
    #[serde(default)]
    pub trial: TrialConfig,

    /// Retry policy for status fetches
    #[serde(default)]
    pub retry: RetryConfig,

    /// Notification configuration
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Daily schedule for the `schedule` command
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Coordinates of the one repository/fork pair trials run against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HostingConfig {
    /// Base URL of the hosting REST API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Owner of the upstream repository trials open PRs against
    #[serde(default)]
    pub owner: String,

    /// Repository name (same in upstream and fork)
    #[serde(default)]
    pub repo: String,

    /// Account holding the fork where trial branches are created
    #[serde(default)]
    pub fork_owner: String,

    /// Branch trials are based on and merged back into
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// API token. Usually supplied via `PULSECHECK_HOSTING__TOKEN`.
    #[serde(default)]
    pub token: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_base_branch() -> String {
    "master".to_string()
}

const fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            owner: String::new(),
            repo: String::new(),
            fork_owner: String::new(),
            base_branch: default_base_branch(),
            token: String::new(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Parameters of one stability batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrialConfig {
    /// Number of trial pull requests per batch
    #[serde(default = "default_count")]
    pub count: usize,

    /// Prefix for generated branch names and PR titles
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    /// PR body text
    #[serde(default = "default_body")]
    pub body: String,

    /// File the trivial trial commit appends a blank line to
    #[serde(default = "default_probe_path")]
    pub probe_path: String,

    /// Name prefix selecting the checks that belong to the trial's CI suite
    #[serde(default = "default_check_prefix")]
    pub check_prefix: String,

    /// Comments posted on each new PR to trigger the suite, one per entry
    #[serde(default)]
    pub trigger_comments: Vec<String>,

    /// Delay between consecutive trial creations, in seconds
    #[serde(default = "default_creation_interval_secs")]
    pub creation_interval_secs: u64,

    /// Delay between monitoring rounds, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Global wall-clock budget for the monitoring loop, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cap on failing checks carried into a single trial's report entry
    #[serde(default = "default_max_reported_failures")]
    pub max_reported_failures: usize,
}

const fn default_count() -> usize {
    10
}

fn default_title_prefix() -> String {
    "stability-trial".to_string()
}

fn default_body() -> String {
    "Automated stability trial: appends a blank line to exercise the CI suite.".to_string()
}

fn default_probe_path() -> String {
    "Makefile".to_string()
}

fn default_check_prefix() -> String {
    "pull-".to_string()
}

const fn default_creation_interval_secs() -> u64 {
    1800
}

const fn default_poll_interval_secs() -> u64 {
    300
}

const fn default_timeout_secs() -> u64 {
    7200
}

const fn default_max_reported_failures() -> usize {
    10
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            title_prefix: default_title_prefix(),
            body: default_body(),
            probe_path: default_probe_path(),
            check_prefix: default_check_prefix(),
            trigger_comments: Vec::new(),
            creation_interval_secs: default_creation_interval_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
            max_reported_failures: default_max_reported_failures(),
        }
    }
}

/// Retry policy knobs for the status poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Total fetch attempts before degrading to an unknown snapshot
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff delay in seconds; doubles on each further retry
    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,

    /// Ceiling on a single backoff delay in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_secs() -> u64 {
    5
}

const fn default_max_backoff_secs() -> u64 {
    300
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_secs: default_initial_backoff_secs(),
            max_backoff_secs: default_max_backoff_secs(),
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotifyConfig {
    /// Whether batch reports are delivered at all
    #[serde(default)]
    pub enabled: bool,

    /// Chat webhook endpoint receiving the report
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// When set, logs are also written to daily-rotated files here
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            directory: None,
        }
    }
}

/// Daily run time for the scheduler, in UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_hour")]
    pub hour: u32,

    #[serde(default)]
    pub minute: u32,
}

const fn default_schedule_hour() -> u32 {
    12
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: default_schedule_hour(),
            minute: 0,
        }
    }
}
