/*
 * Responsibility
 * - Config読み込み → tracing 初期化 → 依存生成 (PgPool, policy) → Router 組み立て
 * - Middleware の適用 (access/authorize, security headers, CORS, request-id/trace)
 * - axum::serve() で起動
 */
use std::path::PathBuf;
use std::sync::Arc;
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::{Config, DEFAULT_LOG_FILTER};
use crate::error::Error;
use crate::middleware;
use crate::repos::db;
use crate::repos::movie_repo::PgMovieRepo;
use crate::services::auth::{
    RbacPolicyStore, build_authenticator, build_authorizer, build_policy_store,
};
use crate::services::logger::LogControl;
use crate::state::AppState;

/// Install the global subscriber. The filter sits behind a reload layer so
/// `PUT /api/v1/logger` can replace it at runtime.
fn init_tracing(directives: &str) -> LogControl {
    let (filter, rejected) = match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(e)),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(e) = rejected {
        tracing::warn!(directives, error = %e, "invalid log filter, using default");
    }
    LogControl::new(handle)
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let log_control = init_tracing(&config.log_filter);
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config, log_control).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// `kill -HUP <pid>` re-reads the policy file. A broken file keeps the current set.
#[cfg(unix)]
fn spawn_policy_reload(store: Arc<RbacPolicyStore>, path: PathBuf) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::warn!(error = %e, "policy reload on SIGHUP disabled");
            return;
        }
    };

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            if let Err(e) = store.reload_from_file(&path) {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    cause = %e.cause_text().unwrap_or_default(),
                    "policy reload failed, keeping the current set"
                );
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_policy_reload(_store: Arc<RbacPolicyStore>, _path: PathBuf) {}

async fn build_state(config: &Config, log_control: LogControl) -> Result<AppState, Error> {
    let store = build_policy_store(config)?;
    let pool = db::connect(&config.database_url).await?;
    spawn_policy_reload(Arc::clone(&store), config.policy_file.clone());

    Ok(AppState::new(
        Arc::new(PgMovieRepo::new(pool)),
        build_authenticator(config),
        build_authorizer(store),
        log_control,
        config.auth_realm.clone(),
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    // layer は後に掛けたものほど外側: access → authorize → handler の順に通る
    let v1 = middleware::auth::authorize::apply(api::v1::routes(), state.clone());
    let v1 = middleware::auth::access::apply(v1, state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
