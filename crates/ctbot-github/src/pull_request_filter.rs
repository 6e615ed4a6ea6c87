use crate::api_types::GithubPullRequestCommit;

/// Return true when the pull request's label set contains the required label.
///
/// Exact string match: the label is a fixed opt-in convention, not a
/// user-facing search.
pub fn pull_request_has_label<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    required_label: &str,
) -> bool {
    labels.into_iter().any(|label| label == required_label)
}

/// Latest commit of a pull request, from its chronological commit listing.
pub fn latest_commit_sha(commits: &[GithubPullRequestCommit]) -> Option<&str> {
    commits.last().map(|commit| commit.sha.as_str())
}

#[cfg(test)]
mod tests {
    use super::{latest_commit_sha, pull_request_has_label};
    use crate::api_types::GithubPullRequestCommit;

    #[test]
    fn unit_pull_request_has_label_requires_exact_match() {
        let labels = ["bug", "continuous-testing"];
        assert!(pull_request_has_label(labels, "continuous-testing"));
        assert!(!pull_request_has_label(labels, "Continuous-Testing"));
        assert!(!pull_request_has_label(labels, "continuous"));
        assert!(!pull_request_has_label([], "continuous-testing"));
    }

    #[test]
    fn unit_latest_commit_sha_takes_the_newest_listing_entry() {
        let commits = vec![
            GithubPullRequestCommit {
                sha: "older".to_string(),
            },
            GithubPullRequestCommit {
                sha: "newest".to_string(),
            },
        ];
        assert_eq!(latest_commit_sha(&commits), Some("newest"));
        assert_eq!(latest_commit_sha(&[]), None);
    }
}
