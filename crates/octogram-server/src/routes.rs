use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use octogram_core::{
    commands::CommandRouter,
    config::Config,
    messaging::port::MessagingPort,
    resolve::{self, Strategy},
    token::TokenCodec,
};

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Option<Arc<dyn MessagingPort>>,
    pub codec: TokenCodec,
    pub router: Arc<CommandRouter>,
    pub strategies: Arc<Vec<Strategy>>,
    pub started_at: String,
}

impl AppState {
    pub fn new(cfg: Arc<Config>, messenger: Option<Arc<dyn MessagingPort>>) -> Self {
        let codec = TokenCodec::new(&cfg.token_secret);
        let router = Arc::new(CommandRouter::new(codec.clone(), cfg.public_url.clone()));
        let strategies = Arc::new(resolve::default_strategies(cfg.default_chat_id));

        Self {
            cfg,
            messenger,
            codec,
            router,
            strategies,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/github",
            post(handlers::github_webhook).fallback(handlers::wrong_method),
        )
        .route(
            "/telegram",
            post(handlers::telegram_update).fallback(handlers::wrong_method),
        )
        .route(
            "/status",
            get(handlers::status).fallback(handlers::wrong_method),
        )
        .route(
            "/register",
            get(handlers::register).fallback(handlers::wrong_method),
        )
        .with_state(state)
}

pub async fn run(cfg: Arc<Config>, messenger: Option<Arc<dyn MessagingPort>>) -> anyhow::Result<()> {
    let state = AppState::new(cfg.clone(), messenger);
    let app = app(state);

    let addr = format!("{}:{}", cfg.bind_host, cfg.bind_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("relay listening on http://{local_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
