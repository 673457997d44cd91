//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces the infrastructure adapters implement:
//! - `HostingClient`: source-control hosting operations (branches, PRs,
//!   comments, status round trips)
//! - `Notifier`: batch report and error-alert delivery
//!
//! These contracts keep the trial state machine independent of any specific
//! platform or delivery channel.

pub mod hosting_client;
pub mod notifier;

pub use hosting_client::HostingClient;
pub use notifier::{FailingTrialReport, Notifier, NullNotifier};
