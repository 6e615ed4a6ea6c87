use std::time::Duration;

use anyhow::{Context, Result};
use ctbot_report::report::TestReport;

/// Anonymous reader for the artifact store's per-commit test reports.
#[derive(Clone)]
pub(super) struct ArtifactFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl ArtifactFetcher {
    pub(super) fn new(base_url: String, request_timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("continuous-testing-bot")
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create artifact store client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL the store publishes the report for `commit_hash` at. Doubles as
    /// the details link in rendered comments.
    pub(super) fn report_url(&self, commit_hash: &str) -> String {
        format!("{}/{commit_hash}.json", self.base_url)
    }

    /// Fetch the test report for a commit, treating every failure as absent.
    ///
    /// The store publishes a report only once the run completes, so a
    /// missing document, a transport error, and a malformed payload all
    /// mean the same thing to the caller: render the pending comment and
    /// let the next cycle retry.
    pub(super) async fn fetch_report(&self, commit_hash: &str) -> Option<TestReport> {
        let url = self.report_url(commit_hash);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!("artifact fetch failed for {url}: {error}");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(
                "artifact not published at {url}: status {}",
                response.status().as_u16()
            );
            return None;
        }
        match response.json::<TestReport>().await {
            Ok(report) => Some(report),
            Err(error) => {
                tracing::debug!("artifact at {url} failed to decode: {error}");
                None
            }
        }
    }
}
