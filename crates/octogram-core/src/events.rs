//! Webhook payload normalization.
//!
//! Turns a raw (event type, JSON body) pair into one canonical notification
//! record. Payloads missing the fields an event type requires normalize to
//! [`Notification::Unrecognized`], which renders empty and is never sent;
//! event types outside the known four still produce a one-line notice.

use serde_json::Value;

/// Commit-message excerpt limit in push notifications.
const COMMIT_EXCERPT_LEN: usize = 100;
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Canonical, event-type-tagged notification record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    PullRequest(PullRequestUpdate),
    Push(PushUpdate),
    Issue(IssueUpdate),
    Release(ReleaseUpdate),
    Other(OtherEvent),
    Unrecognized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRequestUpdate {
    pub actor: String,
    pub repo: String,
    pub title: String,
    pub number: i64,
    pub url: String,
    pub verb: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushUpdate {
    pub actor: String,
    pub repo: String,
    pub branch: String,
    pub excerpt: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueUpdate {
    pub actor: String,
    pub repo: String,
    pub title: String,
    pub number: i64,
    pub url: String,
    pub verb: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseUpdate {
    pub actor: String,
    pub repo: String,
    pub name: String,
    pub url: String,
    pub verb: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtherEvent {
    pub event: String,
}

pub fn normalize(event_type: &str, payload: &Value) -> Notification {
    match event_type {
        "pull_request" => normalize_pull_request(payload),
        "push" => normalize_push(payload),
        "issues" => normalize_issue(payload),
        "release" => normalize_release(payload),
        other => Notification::Other(OtherEvent {
            event: other.to_string(),
        }),
    }
}

fn normalize_pull_request(payload: &Value) -> Notification {
    let (Some(pr), Some(_)) = (payload.get("pull_request"), payload.get("repository")) else {
        return Notification::Unrecognized;
    };

    let action = payload.get("action").and_then(Value::as_str).unwrap_or("");
    let merged = pr.get("merged").and_then(Value::as_bool).unwrap_or(false);
    let verb = match action {
        "opened" => "created".to_string(),
        "closed" if merged => "merged".to_string(),
        "closed" => "closed".to_string(),
        "reopened" => "reopened".to_string(),
        "edited" => "edited".to_string(),
        other => fallback_verb(other),
    };

    Notification::PullRequest(PullRequestUpdate {
        actor: actor(payload),
        repo: repo_name(payload),
        title: str_field(pr, "title"),
        number: pr.get("number").and_then(Value::as_i64).unwrap_or(0),
        url: str_field(pr, "html_url"),
        verb,
    })
}

fn normalize_push(payload: &Value) -> Notification {
    let (Some(_), Some(head)) = (payload.get("repository"), payload.get("head_commit")) else {
        return Notification::Unrecognized;
    };

    let git_ref = payload.get("ref").and_then(Value::as_str).unwrap_or("");
    // Only the fixed branch prefix is stripped; tags and other refs pass
    // through verbatim.
    let branch = git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref);

    Notification::Push(PushUpdate {
        actor: actor(payload),
        repo: repo_name(payload),
        branch: branch.to_string(),
        excerpt: excerpt(&str_field(head, "message"), COMMIT_EXCERPT_LEN),
        url: str_field(head, "url"),
    })
}

fn normalize_issue(payload: &Value) -> Notification {
    let (Some(issue), Some(_)) = (payload.get("issue"), payload.get("repository")) else {
        return Notification::Unrecognized;
    };

    let action = payload.get("action").and_then(Value::as_str).unwrap_or("");
    let verb = match action {
        "opened" => "created".to_string(),
        "closed" => "closed".to_string(),
        "reopened" => "reopened".to_string(),
        "edited" => "edited".to_string(),
        other => fallback_verb(other),
    };

    Notification::Issue(IssueUpdate {
        actor: actor(payload),
        repo: repo_name(payload),
        title: str_field(issue, "title"),
        number: issue.get("number").and_then(Value::as_i64).unwrap_or(0),
        url: str_field(issue, "html_url"),
        verb,
    })
}

fn normalize_release(payload: &Value) -> Notification {
    let (Some(release), Some(_)) = (payload.get("release"), payload.get("repository")) else {
        return Notification::Unrecognized;
    };

    let action = payload.get("action").and_then(Value::as_str).unwrap_or("");
    let verb = match action {
        "published" => "published".to_string(),
        other => fallback_verb(other),
    };

    // Releases are frequently unnamed; fall back to the tag.
    let name = release
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| release.get("tag_name").and_then(Value::as_str).unwrap_or(""));

    Notification::Release(ReleaseUpdate {
        actor: actor(payload),
        repo: repo_name(payload),
        name: name.to_string(),
        url: str_field(release, "html_url"),
        verb,
    })
}

/// The raw action string is preserved verbatim inside the fallback verb.
fn fallback_verb(action: &str) -> String {
    format!("updated ({action})")
}

fn actor(payload: &Value) -> String {
    let login = payload
        .get("sender")
        .and_then(|s| s.get("login"))
        .and_then(Value::as_str)
        .unwrap_or("");
    if login.is_empty() {
        "someone".to_string()
    } else {
        login.to_string()
    }
}

fn repo_name(payload: &Value) -> String {
    payload
        .get("repository")
        .and_then(|r| r.get("full_name"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

/// Truncate to `max_len` characters, appending an ellipsis only when
/// something was actually cut.
fn excerpt(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len).collect();
    out.push_str("...");
    out
}
