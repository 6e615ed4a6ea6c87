use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use ctbot_github::api_types::{
    GithubApp, GithubInstallation, GithubInstallationToken, GithubIssueComment, GithubPullRequest,
    GithubPullRequestCommit, GithubRepository,
};
use ctbot_github::transport::truncate_for_error;

use super::RepoRef;

const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub(super) struct GithubCommentWriteResponse {
    pub(super) id: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct InstallationRepositoriesPage {
    #[serde(default)]
    repositories: Vec<GithubRepository>,
}

/// GitHub REST client bound to one auth context: either the App JWT (app
/// endpoints) or an installation token (repository endpoints). One client
/// is constructed per context per poll cycle.
///
/// Every call is a single attempt; a failed cycle is retried by the next
/// scheduled cycle, never in place.
#[derive(Clone)]
pub(super) struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubApiClient {
    pub(super) fn new(
        api_base: String,
        bearer_token: String,
        request_timeout_ms: u64,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("continuous-testing-bot"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", bearer_token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http: client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// App registration record; the slug names the bot account.
    pub(super) async fn fetch_app(&self) -> Result<GithubApp> {
        self.request_json("resolve app identity", || {
            self.http.get(format!("{}/app", self.api_base))
        })
        .await
    }

    pub(super) async fn list_installations(&self) -> Result<Vec<GithubInstallation>> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<GithubInstallation> = self
                .request_json("list installations", || {
                    self.http
                        .get(format!("{}/app/installations", self.api_base))
                        .query(&[("per_page", "100"), ("page", page_value.as_str())])
                })
                .await?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if chunk_len < PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    pub(super) async fn create_installation_token(
        &self,
        installation_id: u64,
    ) -> Result<GithubInstallationToken> {
        self.request_json("create installation token", || {
            self.http.post(format!(
                "{}/app/installations/{}/access_tokens",
                self.api_base, installation_id
            ))
        })
        .await
    }

    pub(super) async fn list_installation_repositories(&self) -> Result<Vec<GithubRepository>> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: InstallationRepositoriesPage = self
                .request_json("list installation repositories", || {
                    self.http
                        .get(format!("{}/installation/repositories", self.api_base))
                        .query(&[("per_page", "100"), ("page", page_value.as_str())])
                })
                .await?;
            let chunk_len = chunk.repositories.len();
            rows.extend(chunk.repositories);
            if chunk_len < PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    /// Open pull requests in listing order, truncated to `max` rows.
    ///
    /// The scan is bounded by design: repositories with very large open-PR
    /// counts must not make a cycle unbounded.
    pub(super) async fn list_open_pull_requests(
        &self,
        repo: &RepoRef,
        max: usize,
    ) -> Result<Vec<GithubPullRequest>> {
        let per_page = max.clamp(1, PAGE_SIZE);
        let per_page_value = per_page.to_string();
        let mut page = 1_u32;
        let mut rows: Vec<GithubPullRequest> = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<GithubPullRequest> = self
                .request_json("list open pull requests", || {
                    self.http
                        .get(format!(
                            "{}/repos/{}/{}/pulls",
                            self.api_base, repo.owner, repo.name
                        ))
                        .query(&[
                            ("state", "open"),
                            ("per_page", per_page_value.as_str()),
                            ("page", page_value.as_str()),
                        ])
                })
                .await?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if rows.len() >= max || chunk_len < per_page {
                break;
            }
            page = page.saturating_add(1);
        }
        rows.truncate(max);
        Ok(rows)
    }

    /// Commits of a pull request in chronological order, oldest first.
    pub(super) async fn list_pull_request_commits(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<GithubPullRequestCommit>> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<GithubPullRequestCommit> = self
                .request_json("list pull request commits", || {
                    self.http
                        .get(format!(
                            "{}/repos/{}/{}/pulls/{}/commits",
                            self.api_base, repo.owner, repo.name, pull_number
                        ))
                        .query(&[("per_page", "100"), ("page", page_value.as_str())])
                })
                .await?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if chunk_len < PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    pub(super) async fn list_issue_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
    ) -> Result<Vec<GithubIssueComment>> {
        let mut page = 1_u32;
        let mut rows = Vec::new();
        loop {
            let page_value = page.to_string();
            let chunk: Vec<GithubIssueComment> = self
                .request_json("list issue comments", || {
                    self.http
                        .get(format!(
                            "{}/repos/{}/{}/issues/{}/comments",
                            self.api_base, repo.owner, repo.name, issue_number
                        ))
                        .query(&[
                            ("sort", "created"),
                            ("direction", "asc"),
                            ("per_page", "100"),
                            ("page", page_value.as_str()),
                        ])
                })
                .await?;
            let chunk_len = chunk.len();
            rows.extend(chunk);
            if chunk_len < PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(rows)
    }

    pub(super) async fn create_issue_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<GithubCommentWriteResponse> {
        let payload = json!({ "body": body });
        self.request_json("create issue comment", || {
            self.http
                .post(format!(
                    "{}/repos/{}/{}/issues/{}/comments",
                    self.api_base, repo.owner, repo.name, issue_number
                ))
                .json(&payload)
        })
        .await
    }

    pub(super) async fn update_issue_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<GithubCommentWriteResponse> {
        let payload = json!({ "body": body });
        self.request_json("update issue comment", || {
            self.http
                .patch(format!(
                    "{}/repos/{}/{}/issues/comments/{}",
                    self.api_base, repo.owner, repo.name, comment_id
                ))
                .json(&payload)
        })
        .await
    }

    async fn request_json<T, F>(&self, operation: &str, request_builder: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> reqwest::RequestBuilder,
    {
        let response = request_builder()
            .send()
            .await
            .with_context(|| format!("github api {operation} request failed"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "github api {operation} failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 800)
            );
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode github {operation}"))
    }
}
