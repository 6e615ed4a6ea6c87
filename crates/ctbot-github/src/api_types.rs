use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
/// GitHub account payload; only the login is consumed.
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Label attached to an issue or pull request.
pub struct GithubLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Open pull request row from the pulls listing endpoint.
pub struct GithubPullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub user: GithubUser,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Commit row from the pull-request commits listing endpoint.
/// The listing is chronological, oldest first.
pub struct GithubPullRequestCommit {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Issue comment on a pull request.
pub struct GithubIssueComment {
    pub id: u64,
    pub body: Option<String>,
    pub user: GithubUser,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// App installation grant linking the bot to a set of repositories.
pub struct GithubInstallation {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Repository visible to an installation.
pub struct GithubRepository {
    pub id: u64,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// The App's own registration record; the slug names the bot account.
pub struct GithubApp {
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Short-lived installation access token minted from the App JWT.
pub struct GithubInstallationToken {
    pub token: String,
    pub expires_at: String,
}
