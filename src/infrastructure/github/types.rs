//! Wire types for the GitHub REST API.
//!
//! Only the fields the trial lifecycle reads are modeled; everything else in
//! the payloads is ignored by serde.

use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{repo}/branches/{branch}`
#[derive(Debug, Deserialize)]
pub struct BranchInfo {
    pub commit: CommitRef,
}

#[derive(Debug, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/pulls/{number}`
#[derive(Debug, Deserialize)]
pub struct PullDetail {
    pub number: u64,
    /// `open` or `closed`; merged PRs report `closed` plus the flag below
    pub state: String,
    #[serde(default)]
    pub merged: bool,
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/commits`
#[derive(Debug, Deserialize)]
pub struct PullCommit {
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/commits/{sha}/check-runs`
#[derive(Debug, Deserialize)]
pub struct CheckRunList {
    #[serde(default)]
    pub check_runs: Vec<CheckRunWire>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRunWire {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
}

/// One entry of `GET /repos/{owner}/{repo}/commits/{sha}/statuses`,
/// newest first.
#[derive(Debug, Deserialize)]
pub struct CommitStatusWire {
    pub context: String,
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
}

/// `GET /repos/{owner}/{repo}/contents/{path}` (object media type)
#[derive(Debug, Deserialize)]
pub struct ContentMeta {
    pub sha: String,
}

/// Body of `POST /repos/{owner}/{repo}/git/refs`
#[derive(Debug, Serialize)]
pub struct CreateRefBody {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Serialize)]
pub struct UpdateContentBody {
    pub message: String,
    /// Base64-encoded file content, as the contents API requires
    pub content: String,
    pub sha: String,
    pub branch: String,
}

/// Body of `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Serialize)]
pub struct CreatePullBody {
    pub title: String,
    pub body: String,
    /// `fork_owner:branch`
    pub head: String,
    pub base: String,
}

/// Body of `POST /repos/{owner}/{repo}/issues/{number}/comments`
#[derive(Debug, Serialize)]
pub struct CreateCommentBody {
    pub body: String,
}

/// Body of `PATCH /repos/{owner}/{repo}/pulls/{number}`
#[derive(Debug, Serialize)]
pub struct UpdatePullBody {
    pub state: String,
}
