//! GitHub adapter for the hosting-client port.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::GitHubClient;
