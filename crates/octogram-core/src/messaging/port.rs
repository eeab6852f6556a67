use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound chat-platform port.
///
/// Telegram is the only implementation today; the relay consumes exactly
/// three Bot API calls, so the port stays this small. An `ok: false` answer
/// from the platform surfaces as `Error::Upstream`, never as a panic or a
/// retry.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// `sendMessage` with HTML parse mode.
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;

    /// `setWebHook`, pointing bot-update delivery at this relay.
    async fn set_webhook(&self, url: &str) -> Result<()>;

    /// `getWebhookInfo`, reduced to a plain JSON object for status reporting.
    async fn webhook_info(&self) -> Result<serde_json::Value>;
}
