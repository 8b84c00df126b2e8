//! Turn GitHub webhook payloads into Telex messages.
//!
//! Every lookup falls back to a default, so transformation never fails.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::event::GithubEvent;
use super::pretty::to_ascii_pretty;

/// Longest issue/PR/comment body kept in a message, in characters.
pub const MAX_BODY_CHARS: usize = 200;

const UNKNOWN: &str = "unknown";
const NO_TITLE: &str = "No title";

/// Delivery status reported to Telex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Success,
}

/// Message forwarded to Telex.
///
/// Serializes to the JSON body Telex channel webhooks accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub event_name: String,
    pub message: String,
    pub status: MessageStatus,
    pub username: String,
}

/// Build the Telex message for a GitHub event.
pub fn transform(event: &GithubEvent, payload: &Value) -> OutboundMessage {
    let table_username = extract_username(event, payload);

    let (username, message) = match event {
        GithubEvent::Push => {
            let message = push_message(&table_username, payload);
            (table_username, message)
        }
        GithubEvent::Issues => {
            let username = str_or(payload, &["issue", "user", "login"], UNKNOWN);
            let message = format!(
                "GitHub Issue {} by {}:\nTitle: {}\nURL: {}\nDescription: {}",
                str_or(payload, &["action"], UNKNOWN),
                username,
                str_or(payload, &["issue", "title"], NO_TITLE),
                str_or(payload, &["issue", "html_url"], ""),
                truncate_body(&str_or(payload, &["issue", "body"], "")),
            );
            (username, message)
        }
        GithubEvent::PullRequest => {
            let username = str_or(payload, &["sender", "login"], UNKNOWN);
            let message = format!(
                "GitHub Pull Request {} by {}:\nTitle: {}\nURL: {}\nDescription: {}",
                str_or(payload, &["action"], UNKNOWN),
                username,
                str_or(payload, &["pull_request", "title"], NO_TITLE),
                str_or(payload, &["pull_request", "html_url"], ""),
                truncate_body(&str_or(payload, &["pull_request", "body"], "")),
            );
            (username, message)
        }
        GithubEvent::PullRequestReviewComment => {
            let username = str_or(payload, &["sender", "username"], UNKNOWN);
            let message = format!(
                "GitHub Pull Request Review Comment by {}:\nURL: {}\nComment: {}",
                username,
                str_or(payload, &["comment", "html_url"], ""),
                truncate_body(&str_or(payload, &["comment", "body"], "")),
            );
            (username, message)
        }
        GithubEvent::IssueComment | GithubEvent::Other(_) => {
            let message = generic_message(event, payload);
            (table_username, message)
        }
    };

    info!(
        event_name = %event,
        username = %username,
        message_length = message.len(),
        "github_event_transformed"
    );

    OutboundMessage {
        event_name: event.as_str().to_string(),
        message,
        status: MessageStatus::Success,
        username,
    }
}

/// Username lookup used for events without a dedicated branch extraction.
///
/// The issue and pull request paths differ from the ones their message
/// branches read; the branch value wins for those events.
pub fn extract_username(event: &GithubEvent, payload: &Value) -> String {
    let path: &[&str] = match event {
        GithubEvent::Push => &["sender", "username"],
        GithubEvent::PullRequest => &["pull_request", "sender", "username"],
        GithubEvent::Issues => &["issue", "sender", "username"],
        GithubEvent::IssueComment => &["comment", "sender", "username"],
        GithubEvent::PullRequestReviewComment | GithubEvent::Other(_) => {
            return UNKNOWN.to_string()
        }
    };
    str_or(payload, path, UNKNOWN)
}

fn push_message(username: &str, payload: &Value) -> String {
    let commits = field(payload, &["commits"])
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let lines: Vec<String> = commits
        .iter()
        .map(|commit| format!("- {}", str_or(commit, &["message"], "")))
        .collect();

    format!("GitHub Push Event by {}:\n{}", username, lines.join("\n"))
}

fn generic_message(event: &GithubEvent, payload: &Value) -> String {
    let pretty = to_ascii_pretty(payload).unwrap_or_else(|_| payload.to_string());
    format!("GitHub Event: {}\nPayload: {}", event, pretty)
}

/// Keep at most [`MAX_BODY_CHARS`] characters, marking cut text with `...`.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Walk `path` through nested objects.
fn field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// String at `path`, or `default` when missing, null or not a string.
fn str_or(value: &Value, path: &[&str], default: &str) -> String {
    field(value, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
