/// Telegram chat id (numeric). Originates from the platform, never
/// generated locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);
