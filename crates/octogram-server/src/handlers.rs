use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use octogram_core::{
    config::Config, errors::Error, events, format, messaging::port::MessagingPort, resolve,
    signature, Result,
};

use crate::routes::AppState;

/// Uniform `{code, message}` envelope; `code` mirrors the HTTP status.
#[derive(Debug, serde::Serialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
}

fn reply(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (
        status,
        Json(ApiResponse {
            code: status.as_u16(),
            message: message.into(),
        }),
    )
}

fn reply_error(err: &Error) -> (StatusCode, Json<ApiResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // 500s keep their detail in the logs only.
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
        return reply(status, "internal error");
    }
    reply(status, err.to_string())
}

pub async fn wrong_method() -> (StatusCode, Json<ApiResponse>) {
    reply_error(&Error::MethodNotAllowed)
}

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub token: Option<String>,
}

/// GitHub webhook receiver.
///
/// The signature check runs only when BOTH a secret is configured and the
/// `X-Hub-Signature-256` header is present; a delivery that omits the header
/// is accepted even with a secret configured server-side. Known weak point
/// of the trust-on-first-use mode.
pub async fn github_webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse>) {
    match handle_github(&state, &query, &headers, &body).await {
        Ok(message) => reply(StatusCode::OK, message),
        Err(e) => reply_error(&e),
    }
}

async fn handle_github(
    state: &AppState,
    query: &WebhookQuery,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<String> {
    let event_type = header_str(headers, "x-github-event")
        .ok_or_else(|| Error::Validation("missing X-GitHub-Event header".to_string()))?;

    // The raw bytes are checked before any JSON parsing; a re-serialized
    // body would no longer match the sender's digest.
    if let (Some(secret), Some(sig)) = (
        state.cfg.webhook_secret.as_deref(),
        header_str(headers, "x-hub-signature-256"),
    ) {
        if !signature::verify(body, sig, secret) {
            tracing::warn!("webhook signature mismatch");
            return Err(Error::Auth);
        }
    }

    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| Error::Validation("body is not valid JSON".to_string()))?;

    let chat_id = resolve::resolve(&state.strategies, query.token.as_deref(), &state.codec)?;

    let notification = events::normalize(event_type, &payload);
    let text = format::render(&notification);
    if text.is_empty() {
        tracing::info!(event = event_type, "payload produced no notification");
        return Ok("no notification".to_string());
    }

    let messenger = state
        .messenger
        .as_ref()
        .ok_or_else(|| Error::Internal("TELEGRAM_BOT_TOKEN is not configured".to_string()))?;
    messenger.send_html(chat_id, &text).await?;

    tracing::info!(event = event_type, chat_id = chat_id.0, "notification delivered");
    Ok("ok".to_string())
}

/// Telegram bot-update receiver.
///
/// Telegram redelivers any update that is not answered with 200, so once an
/// update is structurally sound the envelope is always 200 and inner
/// failures only reach the logs.
pub async fn telegram_update(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse>) {
    let Ok(update) = serde_json::from_slice::<serde_json::Value>(&body) else {
        return reply(StatusCode::BAD_REQUEST, "body is not valid JSON");
    };
    let Some(message) = octogram_telegram::parse_update(&update) else {
        return reply(StatusCode::BAD_REQUEST, "update carries no message.chat.id");
    };
    let Some(messenger) = state.messenger.as_ref() else {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "TELEGRAM_BOT_TOKEN is not configured",
        );
    };

    match state.router.handle(&message, messenger.as_ref()).await {
        Ok(_) => reply(StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "bot update handling failed");
            reply(StatusCode::OK, "ok")
        }
    }
}

/// Status page: configuration presence flags plus live webhook-registration
/// info from the platform. Always answers 200.
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let webhook = match state.messenger.as_ref() {
        Some(m) => match m.webhook_info().await {
            Ok(info) => info,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        },
        None => serde_json::json!({ "error": "TELEGRAM_BOT_TOKEN is not configured" }),
    };

    let body = serde_json::json!({
        "code": 200,
        "started_at": state.started_at,
        "config": {
            "bot_token": state.cfg.bot_token.is_some(),
            "webhook_secret": state.cfg.webhook_secret.is_some(),
            "default_chat": state.cfg.default_chat_id.is_some(),
            "public_url": state.cfg.public_url,
        },
        "telegram_webhook": webhook,
    });

    (StatusCode::OK, Json(body))
}

#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    pub key: Option<String>,
    pub url: Option<String>,
}

/// One-shot helper that points the platform's bot-update delivery at this
/// relay. Guarded by the webhook shared secret.
pub async fn register(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiResponse>) {
    match handle_register(&state, &query, &headers).await {
        Ok(url) => reply(StatusCode::OK, format!("webhook registered: {url}")),
        Err(e) => reply_error(&e),
    }
}

async fn handle_register(
    state: &AppState,
    query: &RegisterQuery,
    headers: &HeaderMap,
) -> Result<String> {
    let Some(secret) = state.cfg.webhook_secret.as_deref() else {
        return Err(Error::Auth);
    };
    if query.key.as_deref() != Some(secret) {
        return Err(Error::Auth);
    }

    let url = match &query.url {
        Some(u) => u.clone(),
        None => default_update_url(&state.cfg, headers)
            .ok_or_else(|| Error::Routing("no webhook url to register".to_string()))?,
    };

    let messenger = state
        .messenger
        .as_ref()
        .ok_or_else(|| Error::Internal("TELEGRAM_BOT_TOKEN is not configured".to_string()))?;
    messenger.set_webhook(&url).await?;

    tracing::info!(url = %url, "bot webhook registered");
    Ok(url)
}

fn default_update_url(cfg: &Config, headers: &HeaderMap) -> Option<String> {
    if let Some(base) = &cfg.public_url {
        return Some(format!("{base}/telegram"));
    }
    let host = headers.get(header::HOST)?.to_str().ok()?;
    Some(format!("https://{host}/telegram"))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
