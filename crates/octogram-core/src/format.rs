//! Rendering of canonical notifications into Telegram HTML.

use crate::events::Notification;

/// Render a notification as a Telegram HTML message.
///
/// Fixed markup: a bold title line, one hyperlink line, one body line with
/// the repository name. Only `<b>`, `<a>` and `<code>` are ever emitted;
/// titles and commit messages are interpolated verbatim (known limitation of
/// the fixed-tag vocabulary). [`Notification::Unrecognized`] renders as the
/// empty string, which callers treat as "send nothing".
pub fn render(notification: &Notification) -> String {
    match notification {
        Notification::PullRequest(pr) => format!(
            "🔀 <b>{} {} pull request #{}</b>\n<a href=\"{}\">{}</a>\n{}",
            pr.actor, pr.verb, pr.number, pr.url, pr.title, pr.repo
        ),
        Notification::Push(p) => format!(
            "📦 <b>{} pushed to {}</b>\n<a href=\"{}\">{}</a>\n{}",
            p.actor, p.branch, p.url, p.excerpt, p.repo
        ),
        Notification::Issue(issue) => format!(
            "🐛 <b>{} {} issue #{}</b>\n<a href=\"{}\">{}</a>\n{}",
            issue.actor, issue.verb, issue.number, issue.url, issue.title, issue.repo
        ),
        Notification::Release(rel) => format!(
            "🏷 <b>{} {} release</b>\n<a href=\"{}\">{}</a>\n{}",
            rel.actor, rel.verb, rel.url, rel.name, rel.repo
        ),
        Notification::Other(other) => {
            format!("📣 received event: <code>{}</code>", other.event)
        }
        Notification::Unrecognized => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::normalize;
    use serde_json::json;

    #[test]
    fn renders_push_with_branch_and_excerpt() {
        let payload = json!({
            "ref": "refs/heads/main",
            "repository": {"full_name": "a/b"},
            "sender": {"login": "alice"},
            "head_commit": {"message": "x".repeat(150), "url": "c"},
        });
        let text = render(&normalize("push", &payload));

        assert!(text.contains("main"));
        assert!(text.contains("alice"));
        assert!(text.contains("..."));
        assert!(text.contains("<a href=\"c\">"));
    }

    #[test]
    fn renders_merged_pull_request() {
        let payload = json!({
            "action": "closed",
            "pull_request": {"merged": true, "title": "T", "number": 7, "html_url": "h"},
            "repository": {"full_name": "a/b"},
            "sender": {"login": "bob"},
        });
        let text = render(&normalize("pull_request", &payload));

        assert!(text.contains("bob merged pull request #7"));
        assert!(text.contains("a/b"));
    }

    #[test]
    fn renders_fallback_verb_verbatim() {
        let payload = json!({
            "action": "zzz",
            "issue": {"title": "I", "number": 3, "html_url": "h"},
            "repository": {"full_name": "a/b"},
        });
        let text = render(&normalize("issues", &payload));
        assert!(text.contains("zzz"));
    }

    #[test]
    fn unrecognized_renders_empty() {
        let payload = json!({ "repository": {"full_name": "a/b"} });
        assert_eq!(render(&normalize("pull_request", &payload)), "");
    }

    #[test]
    fn unknown_event_renders_single_line_notice() {
        let text = render(&normalize("watch", &json!({})));
        assert!(text.contains("received event"));
        assert!(text.contains("watch"));
        assert_eq!(text.lines().count(), 1);
    }
}
