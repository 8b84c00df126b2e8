//! GitHub event kinds, as named by the `X-GitHub-Event` header.

use std::fmt;

/// Event type reported by GitHub for a webhook delivery.
///
/// Only the events the relay formats specially get their own variant;
/// everything else is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubEvent {
    Push,
    Issues,
    IssueComment,
    PullRequest,
    PullRequestReviewComment,
    Other(String),
}

impl GithubEvent {
    /// Event name used when the header is absent.
    pub const UNKNOWN: &'static str = "unknown";

    /// Map an `X-GitHub-Event` header value onto an event kind.
    pub fn from_header(value: &str) -> Self {
        match value {
            "push" => GithubEvent::Push,
            "issues" => GithubEvent::Issues,
            "issue_comment" => GithubEvent::IssueComment,
            "pull_request" => GithubEvent::PullRequest,
            "pull_request_review_comment" => GithubEvent::PullRequestReviewComment,
            other => GithubEvent::Other(other.to_string()),
        }
    }

    /// The header value this event was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            GithubEvent::Push => "push",
            GithubEvent::Issues => "issues",
            GithubEvent::IssueComment => "issue_comment",
            GithubEvent::PullRequest => "pull_request",
            GithubEvent::PullRequestReviewComment => "pull_request_review_comment",
            GithubEvent::Other(name) => name,
        }
    }
}

impl Default for GithubEvent {
    fn default() -> Self {
        GithubEvent::Other(Self::UNKNOWN.to_string())
    }
}

impl fmt::Display for GithubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
