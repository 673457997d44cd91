//! Hosting-platform collaborator contract.

use async_trait::async_trait;

use crate::domain::errors::HostingResult;
use crate::domain::models::TrialStatus;

/// Operations the trial lifecycle needs from the source-control host.
///
/// The contract is platform-abstract; the GitHub adapter in
/// `infrastructure::github` is the one concrete implementation. Mutating
/// calls are issued at most once per trial per lifecycle step (create once,
/// close once, delete once) — the design does not rely on API-level
/// idempotency.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Latest commit SHA of the configured base branch.
    async fn base_branch_head(&self) -> HostingResult<String>;

    /// Create `name` in the fork, pointing at `base_sha`.
    async fn create_branch(&self, name: &str, base_sha: &str) -> HostingResult<()>;

    /// Fetch a file's content from the upstream repository at `git_ref`.
    async fn fetch_file(&self, path: &str, git_ref: &str) -> HostingResult<String>;

    /// Commit new content for `path` onto `branch` in the fork.
    async fn commit_file_update(
        &self,
        path: &str,
        content: &str,
        branch: &str,
        message: &str,
    ) -> HostingResult<()>;

    /// Open a PR from the fork's `head_branch` against the base branch.
    /// Returns the hosting-assigned PR number.
    async fn open_pull_request(
        &self,
        head_branch: &str,
        title: &str,
        body: &str,
    ) -> HostingResult<u64>;

    /// Post a comment on a PR.
    async fn add_comment(&self, number: u64, text: &str) -> HostingResult<()>;

    /// Close a PR without merging.
    async fn close_pull_request(&self, number: u64) -> HostingResult<()>;

    /// Delete a branch from the fork.
    async fn delete_branch(&self, name: &str) -> HostingResult<()>;

    /// One status round trip: PR state plus the latest commit's checks from
    /// both reporting channels, normalized into one [`TrialStatus`].
    ///
    /// A PR with zero commits yields its PR state with an empty check list;
    /// that is a legitimate answer, not a transient failure, so
    /// implementations must not retry it internally.
    async fn fetch_trial_status(&self, number: u64) -> HostingResult<TrialStatus>;

    /// Human-facing web URL for a PR, used in reports.
    fn pull_request_url(&self, number: u64) -> String;
}
