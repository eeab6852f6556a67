//! Telegram adapter (teloxide).
//!
//! This crate implements the `octogram-core` MessagingPort over the Telegram
//! Bot API and parses raw webhook updates into the core's inbound model.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode};

use octogram_core::{
    domain::ChatId,
    errors::Error,
    messaging::{port::MessagingPort, types::InboundMessage},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    // The relay never retries a send; every Bot API failure surfaces as an
    // upstream error carrying the platform's description.
    fn map_err(e: teloxide::RequestError) -> Error {
        match e {
            teloxide::RequestError::Api(api) => Error::Upstream(api.to_string()),
            other => Error::Upstream(format!("telegram api unreachable: {other}")),
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<()> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| Error::Validation(format!("invalid webhook url: {e}")))?;
        self.bot.set_webhook(url).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn webhook_info(&self) -> Result<serde_json::Value> {
        let info = self.bot.get_webhook_info().await.map_err(Self::map_err)?;
        Ok(serde_json::json!({
            "url": info.url.as_ref().map(|u| u.to_string()),
            "has_custom_certificate": info.has_custom_certificate,
            "pending_update_count": info.pending_update_count,
            "last_error_message": info.last_error_message,
        }))
    }
}

/// Parse a raw Telegram `Update` body into the core inbound model.
///
/// Returns `None` when the update carries no `message.chat.id`; such updates
/// are structurally meaningless to the command router and the caller answers
/// 400 for them.
pub fn parse_update(update: &serde_json::Value) -> Option<InboundMessage> {
    let message = update.get("message")?;
    let chat_id = message.get("chat")?.get("id")?.as_i64()?;
    let text = message
        .get("text")
        .and_then(|t| t.as_str())
        .map(|s| s.to_string());

    Some(InboundMessage {
        chat_id: ChatId(chat_id),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_text_update() {
        let update = json!({
            "update_id": 10,
            "message": {
                "message_id": 5,
                "chat": {"id": -100123, "type": "group"},
                "text": "/token"
            }
        });

        let msg = parse_update(&update).unwrap();
        assert_eq!(msg.chat_id, ChatId(-100123));
        assert_eq!(msg.text.as_deref(), Some("/token"));
    }

    #[test]
    fn update_without_text_still_resolves_chat() {
        let update = json!({
            "update_id": 11,
            "message": {
                "message_id": 6,
                "chat": {"id": 42, "type": "private"},
                "photo": []
            }
        });

        let msg = parse_update(&update).unwrap();
        assert_eq!(msg.chat_id, ChatId(42));
        assert!(msg.text.is_none());
    }

    #[test]
    fn rejects_update_without_message_or_chat() {
        assert!(parse_update(&json!({"update_id": 12})).is_none());
        assert!(parse_update(&json!({"update_id": 13, "message": {"message_id": 7}})).is_none());
        assert!(parse_update(&json!("not an object")).is_none());
    }
}
