/*
 * Responsibility
 * - Config読み込み → 依存生成 (AppState) → Router 組み立て
 * - Middleware の適用順 (外側から): request-id → observer → CORS/limit → routes (+auth)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::{GameStore, InMemoryGameStore, PgGameStore};
use crate::services::access_log::{AccessLogSink, FileAccessLog, TracingAccessLog};
use crate::services::auth::{OpenAuthenticator, TokenCodec};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,games_api=debug,access_log=info cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Missing/empty secret is fatal here, never a per-request error.
    let tokens = TokenCodec::new(&config.jwt_secret, config.token_ttl_seconds)
        .context("failed to build token codec")?;

    let games: Arc<dyn GameStore> = match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            let store = PgGameStore::new(pool);
            store.ensure_schema().await?;
            tracing::info!("using postgres game store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory game store");
            Arc::new(InMemoryGameStore::new())
        }
    };

    let access_log: Arc<dyn AccessLogSink> = match &config.access_log_path {
        Some(path) => Arc::new(
            FileAccessLog::open(path)
                .with_context(|| format!("failed to open access log {}", path.display()))?,
        ),
        None => Arc::new(TracingAccessLog),
    };

    tracing::warn!("POST /login issues tokens without a credential check");

    Ok(AppState::new(
        games,
        Arc::new(tokens),
        Arc::new(OpenAuthenticator),
        access_log,
    ))
}

/// Full application: the exact router `run()` serves.
///
/// Request ids are assigned outside the observer so every access log entry
/// carries one; CORS and the body limit sit inside it so their short-circuit
/// responses are logged too.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let routes = api::routes(state.clone());
    let routes = middleware::http::apply_guards(routes, config);
    let routes = middleware::observer::apply(routes, state.clone());

    middleware::http::apply_request_id(routes.with_state(state))
}
