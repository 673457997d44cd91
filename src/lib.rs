//! Pulsecheck - CI Stability Trial Runner
//!
//! Pulsecheck repeatedly takes the pulse of a CI pipeline: it opens a batch
//! of trivial pull requests against a hosted repository, waits for each to
//! accumulate check signal from both the check-run and legacy commit-status
//! reporting channels, decides pass/fail per trial under a global timeout,
//! and reports the aggregate.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): check/trial models, collaborator ports,
//!   domain errors
//! - **Service Layer** (`services`): the evaluator, poller, orchestrator and
//!   scheduler — all of the state, timing and failure-handling semantics
//! - **Infrastructure Layer** (`infrastructure`): GitHub adapter, webhook
//!   notifier, configuration loading
//! - **CLI Layer** (`cli`): command-line interface
//!
//! Execution is single-threaded and sequential throughout: trials are
//! created one at a time, polled one at a time, and the only suspensions
//! are timed waits.

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BatchResult, Check, CheckConclusion, CheckFailure, CheckSource, CheckStatus, Config,
    PullState, Trial, TrialOutcome, TrialStatus,
};
pub use domain::ports::{FailingTrialReport, HostingClient, Notifier, NullNotifier};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{RelevanceFilter, RetryPolicy, StabilityOrchestrator, TrialEvaluator, TrialPoller};
