//! Domain errors for the pulsecheck system.

use thiserror::Error;

/// Errors surfaced by the hosting-platform collaborator.
///
/// The taxonomy matters more than the variants: [`HostingError::is_transient`]
/// decides whether the poller retries (network blips, rate limits, server
/// errors) or gives up immediately (auth failures, missing resources,
/// malformed requests). Either way, exhaustion degrades to an unknown status
/// snapshot rather than propagating out of the poller.
#[derive(Debug, Error)]
pub enum HostingError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by hosting API")]
    RateLimited,

    #[error("hosting API server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request ({status}): {message}")]
    InvalidRequest { status: u16, message: String },

    #[error("failed to decode hosting API response: {0}")]
    Decode(String),
}

impl HostingError {
    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited | Self::Server { .. }
        )
    }
}

pub type HostingResult<T> = Result<T, HostingError>;

/// Errors surfaced by the notification collaborator.
///
/// Delivery failures never affect trial outcomes; callers log and move on.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    #[error("webhook rejected report ({status})")]
    Rejected { status: u16 },
}

pub type NotifyResult<T> = Result<T, NotifyError>;
