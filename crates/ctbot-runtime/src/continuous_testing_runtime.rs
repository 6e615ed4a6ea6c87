//! Poll-cycle orchestration: installations → repositories → labeled pull
//! requests → fetch/render/reconcile, on a cancellable interval loop.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use ctbot_github::api_types::{GithubPullRequest, GithubRepository};
use ctbot_github::pull_request_filter::{latest_commit_sha, pull_request_has_label};
use ctbot_github::reconcile::{plan_comment_action, CommentAction};
use ctbot_report::render::{render_pending_comment, render_report_comment};

mod app_auth;
mod artifact_fetcher;
mod github_api_client;
#[cfg(test)]
mod tests;

use app_auth::GithubAppAuth;
use artifact_fetcher::ArtifactFetcher;
use github_api_client::GithubApiClient;

#[derive(Clone)]
/// Runtime configuration for the continuous-testing poll loop.
///
/// Constructed once at startup and passed by value; there is no ambient
/// configuration state anywhere in the runtime.
pub struct ContinuousTestingRuntimeConfig {
    pub app_id: String,
    pub private_key_pem: String,
    pub api_base: String,
    pub artifact_base_url: String,
    pub required_label: String,
    /// Login of the bot account. Resolved from the App slug when `None`.
    pub bot_login: Option<String>,
    pub poll_interval: Duration,
    pub poll_once: bool,
    pub max_pull_requests: usize,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| anyhow!("invalid repository full name '{raw}', expected owner/repo"))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid repository full name '{raw}', expected owner/repo");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Default)]
struct PollCycleReport {
    installations: usize,
    repositories: usize,
    matched_pull_requests: usize,
    comments_created: usize,
    comments_updated: usize,
    comments_unchanged: usize,
    failed_installations: usize,
    failed_repositories: usize,
    failed_pull_requests: usize,
}

impl PollCycleReport {
    fn failed_total(&self) -> usize {
        self.failed_installations + self.failed_repositories + self.failed_pull_requests
    }
}

/// Runs the continuous-testing bot until cancelled (or for one cycle in
/// `poll_once` mode).
pub async fn run_continuous_testing_bot(config: ContinuousTestingRuntimeConfig) -> Result<()> {
    let mut runtime = ContinuousTestingRuntime::new(config).await?;
    runtime.run().await
}

struct ContinuousTestingRuntime {
    config: ContinuousTestingRuntimeConfig,
    app_auth: GithubAppAuth,
    artifact_fetcher: ArtifactFetcher,
    bot_login: String,
}

impl ContinuousTestingRuntime {
    async fn new(config: ContinuousTestingRuntimeConfig) -> Result<Self> {
        let app_auth = GithubAppAuth::new(&config.app_id, &config.private_key_pem)?;
        let artifact_fetcher =
            ArtifactFetcher::new(config.artifact_base_url.clone(), config.request_timeout_ms)?;
        let bot_login = match config.bot_login.clone() {
            Some(login) => login,
            None => {
                let app_client = GithubApiClient::new(
                    config.api_base.clone(),
                    app_auth.signed_jwt()?,
                    config.request_timeout_ms,
                )?;
                let app = app_client.fetch_app().await?;
                format!("{}[bot]", app.slug)
            }
        };
        Ok(Self {
            config,
            app_auth,
            artifact_fetcher,
            bot_login,
        })
    }

    async fn run(&mut self) -> Result<()> {
        loop {
            match self.poll_once().await {
                Ok(report) => {
                    println!(
                        "continuous testing poll: installations={} repositories={} matched_prs={} created={} updated={} unchanged={} failed={}",
                        report.installations,
                        report.repositories,
                        report.matched_pull_requests,
                        report.comments_created,
                        report.comments_updated,
                        report.comments_unchanged,
                        report.failed_total()
                    );
                    if self.config.poll_once {
                        return Ok(());
                    }
                }
                Err(error) => {
                    eprintln!("continuous testing poll error: {error:#}");
                    if self.config.poll_once {
                        return Err(error);
                    }
                }
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    println!("continuous testing shutdown requested");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    /// One full poll cycle. Failures below the cycle level are isolated:
    /// a broken installation, repository, or pull request is logged and
    /// counted without aborting the rest of the batch.
    async fn poll_once(&self) -> Result<PollCycleReport> {
        let mut report = PollCycleReport::default();
        let app_client = GithubApiClient::new(
            self.config.api_base.clone(),
            self.app_auth.signed_jwt()?,
            self.config.request_timeout_ms,
        )?;
        let installations = app_client.list_installations().await?;
        report.installations = installations.len();
        for installation in installations {
            if let Err(error) = self
                .poll_installation(&app_client, installation.id, &mut report)
                .await
            {
                report.failed_installations = report.failed_installations.saturating_add(1);
                eprintln!(
                    "continuous testing installation poll failed: installation={} error={error:#}",
                    installation.id
                );
            }
        }
        Ok(report)
    }

    async fn poll_installation(
        &self,
        app_client: &GithubApiClient,
        installation_id: u64,
        report: &mut PollCycleReport,
    ) -> Result<()> {
        let token = app_client.create_installation_token(installation_id).await?;
        let installation_client = GithubApiClient::new(
            self.config.api_base.clone(),
            token.token,
            self.config.request_timeout_ms,
        )?;
        let repositories = installation_client.list_installation_repositories().await?;
        for repository in repositories {
            report.repositories = report.repositories.saturating_add(1);
            if let Err(error) = self
                .poll_repository(&installation_client, &repository, report)
                .await
            {
                report.failed_repositories = report.failed_repositories.saturating_add(1);
                eprintln!(
                    "continuous testing repository poll failed: repo={} error={error:#}",
                    repository.full_name
                );
            }
        }
        Ok(())
    }

    async fn poll_repository(
        &self,
        client: &GithubApiClient,
        repository: &GithubRepository,
        report: &mut PollCycleReport,
    ) -> Result<()> {
        let repo = RepoRef::parse(&repository.full_name)?;
        let pulls = client
            .list_open_pull_requests(&repo, self.config.max_pull_requests)
            .await?;
        for pull in pulls {
            if !pull_request_has_label(
                pull.labels.iter().map(|label| label.name.as_str()),
                &self.config.required_label,
            ) {
                continue;
            }
            report.matched_pull_requests = report.matched_pull_requests.saturating_add(1);
            if let Err(error) = self
                .process_pull_request(client, &repo, &pull, report)
                .await
            {
                report.failed_pull_requests = report.failed_pull_requests.saturating_add(1);
                eprintln!(
                    "continuous testing pull request poll failed: repo={} pr={} error={error:#}",
                    repo.as_slug(),
                    pull.number
                );
            }
        }
        Ok(())
    }

    async fn process_pull_request(
        &self,
        client: &GithubApiClient,
        repo: &RepoRef,
        pull: &GithubPullRequest,
        report: &mut PollCycleReport,
    ) -> Result<()> {
        let commits = client.list_pull_request_commits(repo, pull.number).await?;
        let Some(head_sha) = latest_commit_sha(&commits) else {
            tracing::debug!(
                "pull request {}#{} has no commits, skipping",
                repo.as_slug(),
                pull.number
            );
            return Ok(());
        };

        let body = match self.artifact_fetcher.fetch_report(head_sha).await {
            Some(test_report) => {
                render_report_comment(&test_report, &self.artifact_fetcher.report_url(head_sha))
            }
            None => render_pending_comment(head_sha),
        };

        let comments = client.list_issue_comments(repo, pull.number).await?;
        match plan_comment_action(&comments, &self.bot_login, &body) {
            CommentAction::Skip => {
                report.comments_unchanged = report.comments_unchanged.saturating_add(1);
            }
            CommentAction::Create => {
                let created = client.create_issue_comment(repo, pull.number, &body).await?;
                tracing::debug!(
                    "created comment {} on {}#{}",
                    created.id,
                    repo.as_slug(),
                    pull.number
                );
                report.comments_created = report.comments_created.saturating_add(1);
            }
            CommentAction::Update { comment_id } => {
                client.update_issue_comment(repo, comment_id, &body).await?;
                tracing::debug!(
                    "updated comment {} on {}#{}",
                    comment_id,
                    repo.as_slug(),
                    pull.number
                );
                report.comments_updated = report.comments_updated.saturating_add(1);
            }
        }
        Ok(())
    }
}
