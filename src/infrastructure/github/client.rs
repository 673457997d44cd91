//! GitHub REST adapter for the hosting-client port.
//!
//! Connection pooling, auth headers and error classification live here; the
//! trial state machine never sees an HTTP status code. Branch mutations go
//! to the fork, PRs and status reads go to the upstream repository.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::errors::{HostingError, HostingResult};
use crate::domain::models::{HostingConfig, PullState, TrialStatus};
use crate::domain::ports::HostingClient;

use super::normalize::normalize_checks;
use super::types::{
    BranchInfo, CheckRunList, CommitStatusWire, ContentMeta, CreateCommentBody, CreatePullBody,
    CreateRefBody, PullCommit, PullDetail, UpdateContentBody, UpdatePullBody,
};

const USER_AGENT: &str = concat!("pulsecheck/", env!("CARGO_PKG_VERSION"));

/// HTTP client for one upstream/fork repository pair.
pub struct GitHubClient {
    http: ReqwestClient,
    api_base: String,
    owner: String,
    repo: String,
    fork_owner: String,
    base_branch: String,
}

impl GitHubClient {
    /// Build the client. Construction failure (bad token characters, TLS
    /// setup) is fatal for the run, hence `anyhow` here rather than
    /// [`HostingError`].
    pub fn new(config: &HostingConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .context("API token contains invalid header characters")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = ReqwestClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            fork_owner: config.fork_owner.clone(),
            base_branch: config.base_branch.clone(),
        })
    }

    fn upstream(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{path}",
            self.api_base, self.owner, self.repo
        )
    }

    fn fork(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{path}",
            self.api_base, self.fork_owner, self.repo
        )
    }

    async fn send(&self, request: RequestBuilder) -> HostingResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| HostingError::Network(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_response(status, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> HostingResult<T> {
        let response = self.send(self.http.get(&url)).await?;
        response
            .json()
            .await
            .map_err(|err| HostingError::Decode(err.to_string()))
    }
}

/// Map an HTTP error response onto the domain taxonomy.
///
/// GitHub signals primary rate limiting as 403 with an explanatory body and
/// secondary limiting as 429; both must be retried, unlike other 4xx.
fn classify_response(status: StatusCode, body: String) -> HostingError {
    let message = body.chars().take(200).collect::<String>();
    match status {
        StatusCode::TOO_MANY_REQUESTS => HostingError::RateLimited,
        StatusCode::FORBIDDEN if body.contains("rate limit") => HostingError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HostingError::Auth(message),
        StatusCode::NOT_FOUND => HostingError::NotFound(message),
        s if s.is_server_error() => HostingError::Server {
            status: s.as_u16(),
            message,
        },
        s => HostingError::InvalidRequest {
            status: s.as_u16(),
            message,
        },
    }
}

fn parse_pull_state(state: &str, merged: bool) -> PullState {
    if merged {
        return PullState::Merged;
    }
    match state {
        "open" => PullState::Open,
        "closed" => PullState::Closed,
        _ => PullState::Unknown,
    }
}

#[async_trait]
impl HostingClient for GitHubClient {
    async fn base_branch_head(&self) -> HostingResult<String> {
        let url = self.upstream(&format!("/branches/{}", self.base_branch));
        let info: BranchInfo = self.get_json(url).await?;
        Ok(info.commit.sha)
    }

    async fn create_branch(&self, name: &str, base_sha: &str) -> HostingResult<()> {
        let url = self.fork("/git/refs");
        let body = CreateRefBody {
            git_ref: format!("refs/heads/{name}"),
            sha: base_sha.to_string(),
        };
        self.send(self.http.post(&url).json(&body)).await?;
        debug!(branch = name, sha = base_sha, "created branch");
        Ok(())
    }

    async fn fetch_file(&self, path: &str, git_ref: &str) -> HostingResult<String> {
        let url = self.upstream(&format!("/contents/{path}"));
        let response = self
            .send(
                self.http
                    .get(&url)
                    .query(&[("ref", git_ref)])
                    .header(ACCEPT, "application/vnd.github.raw+json"),
            )
            .await?;
        response
            .text()
            .await
            .map_err(|err| HostingError::Decode(err.to_string()))
    }

    async fn commit_file_update(
        &self,
        path: &str,
        content: &str,
        branch: &str,
        message: &str,
    ) -> HostingResult<()> {
        // The contents API needs the blob SHA currently at `path` on the
        // branch, otherwise the update is rejected as a conflict.
        let meta_url = self.fork(&format!("/contents/{path}"));
        let meta: ContentMeta = {
            let response = self
                .send(self.http.get(&meta_url).query(&[("ref", branch)]))
                .await?;
            response
                .json()
                .await
                .map_err(|err| HostingError::Decode(err.to_string()))?
        };

        let body = UpdateContentBody {
            message: message.to_string(),
            content: BASE64.encode(content.as_bytes()),
            sha: meta.sha,
            branch: branch.to_string(),
        };
        self.send(self.http.put(&meta_url).json(&body)).await?;
        debug!(path, branch, "committed file update");
        Ok(())
    }

    async fn open_pull_request(
        &self,
        head_branch: &str,
        title: &str,
        body: &str,
    ) -> HostingResult<u64> {
        let url = self.upstream("/pulls");
        let payload = CreatePullBody {
            title: title.to_string(),
            body: body.to_string(),
            head: format!("{}:{head_branch}", self.fork_owner),
            base: self.base_branch.clone(),
        };
        let response = self.send(self.http.post(&url).json(&payload)).await?;
        let pull: PullDetail = response
            .json()
            .await
            .map_err(|err| HostingError::Decode(err.to_string()))?;
        Ok(pull.number)
    }

    async fn add_comment(&self, number: u64, text: &str) -> HostingResult<()> {
        let url = self.upstream(&format!("/issues/{number}/comments"));
        let body = CreateCommentBody {
            body: text.to_string(),
        };
        self.send(self.http.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn close_pull_request(&self, number: u64) -> HostingResult<()> {
        let url = self.upstream(&format!("/pulls/{number}"));
        let body = UpdatePullBody {
            state: "closed".to_string(),
        };
        self.send(self.http.patch(&url).json(&body)).await?;
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> HostingResult<()> {
        let url = self.fork(&format!("/git/refs/heads/{name}"));
        self.send(self.http.delete(&url)).await?;
        Ok(())
    }

    async fn fetch_trial_status(&self, number: u64) -> HostingResult<TrialStatus> {
        let pull: PullDetail = self
            .get_json(self.upstream(&format!("/pulls/{number}")))
            .await?;
        let state = parse_pull_state(&pull.state, pull.merged);

        let commits: Vec<PullCommit> = self
            .get_json(self.upstream(&format!("/pulls/{number}/commits")))
            .await?;
        // A PR with no commits has no commit to report checks against.
        // Legitimate immediate answer, not a failure to retry.
        let Some(head) = commits.last() else {
            return Ok(TrialStatus::new(state, pull.merged, Vec::new()));
        };

        let runs: CheckRunList = self
            .get_json(self.upstream(&format!("/commits/{}/check-runs", head.sha)))
            .await?;
        let statuses: Vec<CommitStatusWire> = self
            .get_json(self.upstream(&format!("/commits/{}/statuses", head.sha)))
            .await?;

        let checks = normalize_checks(&runs.check_runs, &statuses);
        debug!(
            pull = number,
            check_runs = runs.check_runs.len(),
            legacy = statuses.len(),
            normalized = checks.len(),
            state = state.as_str(),
            "fetched trial status"
        );
        Ok(TrialStatus::new(state, pull.merged, checks))
    }

    fn pull_request_url(&self, number: u64) -> String {
        format!("https://github.com/{}/{}/pull/{number}", self.owner, self.repo)
    }
}
