use crate::domain::ChatId;

/// Cross-messenger inbound message model.
///
/// Telegram-specific parsing lives in the Telegram adapter; the command
/// router only ever sees this shape.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub text: Option<String>,
}
