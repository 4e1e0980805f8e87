/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config 読み込み → 依存生成 (PgPool, TokenService, Verifier) → Router 組み立て
 * - Middleware の適用 (CORS / HTTP 共通)
 * - 公開 listener と内部 (token 発行) listener を axum::serve() で並行起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::UserLookup;
use crate::services::auth::factory::{build_access_verifier, build_token_service};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,center_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting center-auth in {:?} mode on {} (internal {})",
        config.app_env,
        config.addr,
        config.internal_addr
    );
    tracing::debug!(?config, "loaded configuration");

    let state = build_state(&config)?;
    let app = build_router(state.clone(), &config);
    let internal = build_internal_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    let internal_listener = tokio::net::TcpListener::bind(config.internal_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.internal_addr))?;

    tokio::try_join!(
        async { axum::serve(listener, app).await.context("server error") },
        async {
            axum::serve(internal_listener, internal)
                .await
                .context("internal server error")
        },
    )?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    let users: Arc<dyn UserLookup> = Arc::new(UserRepo::new(pool));
    let tokens = build_token_service(config, users.clone())
        .context("failed to build token service")?;
    let verifier = build_access_verifier(config).context("failed to build access verifier")?;

    Ok(AppState::new(users, tokens, verifier))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

// No CORS: browsers never talk to the issuance listener.
fn build_internal_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::internal_routes())
        .with_state(state);

    middleware::http::apply(router, config)
}
