use std::sync::Arc;

use octogram_core::{config::Config, messaging::port::MessagingPort};
use octogram_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> Result<(), octogram_core::Error> {
    octogram_core::logging::init("octogram")?;

    let cfg = Arc::new(Config::load()?);

    let messenger: Option<Arc<dyn MessagingPort>> = cfg
        .bot_token
        .as_deref()
        .map(|token| Arc::new(TelegramMessenger::from_token(token)) as Arc<dyn MessagingPort>);
    if messenger.is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN not set; outbound delivery is disabled");
    }

    octogram_server::run(cfg, messenger)
        .await
        .map_err(|e| octogram_core::Error::Internal(format!("server failed: {e}")))?;

    Ok(())
}
