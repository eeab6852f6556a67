//! Inbound chat-command routing.
//!
//! One command exists today: `/token` answers with a webhook token encoding
//! the requesting chat. Everything else is acknowledged and ignored, so the
//! bot never argues with group chatter.

use crate::{
    messaging::{port::MessagingPort, types::InboundMessage},
    token::TokenCodec,
    Result,
};

/// Outcome of routing one inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    TokenIssued,
    Ignored,
}

pub struct CommandRouter {
    codec: TokenCodec,
    public_url: Option<String>,
}

impl CommandRouter {
    pub fn new(codec: TokenCodec, public_url: Option<String>) -> Self {
        Self { codec, public_url }
    }

    pub async fn handle(
        &self,
        msg: &InboundMessage,
        messenger: &dyn MessagingPort,
    ) -> Result<RouteOutcome> {
        let Some(text) = msg.text.as_deref() else {
            return Ok(RouteOutcome::Ignored);
        };
        if !text.trim_start().starts_with('/') {
            return Ok(RouteOutcome::Ignored);
        }

        let (cmd, _) = parse_command(text);
        if cmd != "token" {
            return Ok(RouteOutcome::Ignored);
        }

        let token = self.codec.encode(msg.chat_id)?;
        messenger.send_html(msg.chat_id, &self.token_reply(&token)).await?;
        tracing::info!(chat_id = msg.chat_id.0, "issued chat token");
        Ok(RouteOutcome::TokenIssued)
    }

    fn token_reply(&self, token: &str) -> String {
        let mut out = format!(
            "🔗 <b>Webhook token</b>\n<code>{token}</code>\n\n\
Append it to this relay's webhook endpoint as <code>?token=...</code> when \
configuring the repository webhook."
        );
        if let Some(base) = &self.public_url {
            out.push_str(&format!("\n<code>{base}/github?token={token}</code>"));
        }
        out
    }
}

/// Split `/cmd@botname arg1 ...` into (command, rest).
fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatId;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
            self.sent.lock().unwrap().push((chat_id.0, html.to_string()));
            Ok(())
        }

        async fn set_webhook(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn webhook_info(&self) -> Result<serde_json::Value> {
            Ok(serde_json::json!({}))
        }
    }

    fn router() -> CommandRouter {
        CommandRouter::new(TokenCodec::new("cmd-secret"), Some("https://relay.test".to_string()))
    }

    fn msg(text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(1234),
            text: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn token_command_sends_decodable_token_to_same_chat() {
        let messenger = RecordingMessenger::default();
        let outcome = router().handle(&msg("/token"), &messenger).await.unwrap();
        assert_eq!(outcome, RouteOutcome::TokenIssued);

        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 1234);
        assert!(sent[0].1.contains("https://relay.test/github?token="));

        // The token in the reply decodes back to the requesting chat.
        let codec = TokenCodec::new("cmd-secret");
        let token = sent[0]
            .1
            .rsplit("?token=")
            .next()
            .and_then(|rest| rest.split('<').next())
            .unwrap();
        assert_eq!(codec.decode(token).unwrap(), ChatId(1234));
    }

    #[tokio::test]
    async fn botname_suffix_is_accepted() {
        let messenger = RecordingMessenger::default();
        let outcome = router()
            .handle(&msg("/token@octogram_bot"), &messenger)
            .await
            .unwrap();
        assert_eq!(outcome, RouteOutcome::TokenIssued);
    }

    #[tokio::test]
    async fn other_text_is_a_no_op() {
        let messenger = RecordingMessenger::default();
        for text in ["hello", "/start", "token"] {
            let outcome = router().handle(&msg(text), &messenger).await.unwrap();
            assert_eq!(outcome, RouteOutcome::Ignored);
        }
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn message_without_text_is_a_no_op() {
        let messenger = RecordingMessenger::default();
        let message = InboundMessage {
            chat_id: ChatId(1),
            text: None,
        };
        let outcome = router().handle(&message, &messenger).await.unwrap();
        assert_eq!(outcome, RouteOutcome::Ignored);
    }
}
