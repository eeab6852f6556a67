use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

/// Typed configuration for the relay.
///
/// All values are read once at startup and shared read-only; request
/// handlers never consult the environment directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot credentials. Optional: endpoints that need the bot
    /// answer 500 when it is absent instead of failing startup.
    pub bot_token: Option<String>,
    /// Shared secret for GitHub webhook signatures; doubles as the key for
    /// the `/register` endpoint.
    pub webhook_secret: Option<String>,
    /// Key material for the chat-token codec. Rotating it invalidates every
    /// token issued so far.
    pub token_secret: String,
    /// Fixed chat target, taking priority over token-derived targets.
    pub default_chat_id: Option<i64>,
    /// Public base URL of this relay, used in token replies and as the
    /// default webhook-registration target.
    pub public_url: Option<String>,

    pub bind_host: String,
    pub bind_port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let token_secret = env_str("CHAT_TOKEN_SECRET")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("CHAT_TOKEN_SECRET environment variable is required".to_string())
            })?;

        let bot_token = env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty);
        let webhook_secret = env_str("GITHUB_WEBHOOK_SECRET").and_then(non_empty);
        let default_chat_id = env_str("DEFAULT_CHAT_ID").and_then(|s| s.trim().parse::<i64>().ok());
        let public_url = env_str("PUBLIC_URL")
            .and_then(non_empty)
            .map(|u| u.trim_end_matches('/').to_string());

        let bind_host = env_str("HOST")
            .and_then(non_empty)
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let bind_port = env_str("PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Self {
            bot_token,
            webhook_secret,
            token_secret,
            default_chat_id,
            public_url,
            bind_host,
            bind_port,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
