use crate::api_types::GithubIssueComment;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Write decision for the canonical bot comment on a pull request.
pub enum CommentAction {
    /// The canonical comment already carries the rendered body.
    Skip,
    /// No bot-authored comment exists yet.
    Create,
    /// The canonical comment exists with a stale body.
    Update { comment_id: u64 },
}

/// Decide how to reconcile a freshly rendered body against existing comments.
///
/// The first comment authored by `bot_login`, in listing order, is the
/// canonical bot comment; later bot-authored comments are never touched, so
/// reconciliation can never grow the comment count past one. An identical
/// body is a no-op, which keeps repeated poll cycles write-free and avoids
/// notification noise.
pub fn plan_comment_action(
    comments: &[GithubIssueComment],
    bot_login: &str,
    new_body: &str,
) -> CommentAction {
    for comment in comments {
        if comment.user.login != bot_login {
            continue;
        }
        if comment.body.as_deref() == Some(new_body) {
            return CommentAction::Skip;
        }
        return CommentAction::Update {
            comment_id: comment.id,
        };
    }
    CommentAction::Create
}

#[cfg(test)]
mod tests {
    use super::{plan_comment_action, CommentAction};
    use crate::api_types::{GithubIssueComment, GithubUser};

    const BOT_LOGIN: &str = "continuous-testing-bot[bot]";

    fn comment(id: u64, login: &str, body: &str) -> GithubIssueComment {
        GithubIssueComment {
            id,
            body: Some(body.to_string()),
            user: GithubUser {
                login: login.to_string(),
            },
        }
    }

    #[test]
    fn unit_plan_comment_action_creates_when_no_bot_comment_exists() {
        let comments = vec![comment(1, "alice", "looks good")];
        assert_eq!(
            plan_comment_action(&comments, BOT_LOGIN, "body"),
            CommentAction::Create
        );
    }

    #[test]
    fn unit_plan_comment_action_updates_stale_canonical_comment() {
        let comments = vec![
            comment(1, "alice", "looks good"),
            comment(2, BOT_LOGIN, "old render"),
        ];
        assert_eq!(
            plan_comment_action(&comments, BOT_LOGIN, "new render"),
            CommentAction::Update { comment_id: 2 }
        );
    }

    #[test]
    fn functional_plan_comment_action_is_idempotent_after_apply() {
        let body = "rendered body";
        assert_eq!(
            plan_comment_action(&[], BOT_LOGIN, body),
            CommentAction::Create
        );
        // After the create lands, the same render is a no-op.
        let comments = vec![comment(9, BOT_LOGIN, body)];
        assert_eq!(
            plan_comment_action(&comments, BOT_LOGIN, body),
            CommentAction::Skip
        );
    }

    #[test]
    fn regression_first_bot_comment_wins_over_later_duplicates() {
        let comments = vec![
            comment(1, BOT_LOGIN, "first"),
            comment(2, BOT_LOGIN, "second"),
        ];
        assert_eq!(
            plan_comment_action(&comments, BOT_LOGIN, "fresh"),
            CommentAction::Update { comment_id: 1 }
        );
        // Even when a later duplicate already matches, the first is canonical.
        assert_eq!(
            plan_comment_action(&comments, BOT_LOGIN, "second"),
            CommentAction::Update { comment_id: 1 }
        );
    }

    #[test]
    fn regression_comment_with_null_body_counts_as_stale() {
        let comments = vec![GithubIssueComment {
            id: 3,
            body: None,
            user: GithubUser {
                login: BOT_LOGIN.to_string(),
            },
        }];
        assert_eq!(
            plan_comment_action(&comments, BOT_LOGIN, "body"),
            CommentAction::Update { comment_id: 3 }
        );
    }
}
