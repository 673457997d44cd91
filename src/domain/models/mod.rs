//! Domain models.

pub mod check;
pub mod config;
pub mod trial;

pub use check::{Check, CheckConclusion, CheckSource, CheckStatus};
pub use config::{
    Config, HostingConfig, LoggingConfig, NotifyConfig, RetryConfig, ScheduleConfig, TrialConfig,
};
pub use trial::{BatchResult, CheckFailure, PullState, Trial, TrialOutcome, TrialStatus};
