// src/lib.rs
// Public library surface for the binary, integration tests and demos.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod iss;
pub mod neo;
pub mod news;
pub mod notify;
pub mod screen;
pub mod screens;
pub mod telemetry;

use axum::Router;
use std::sync::Arc;
use tracing::info;

pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::FetchError;
pub use crate::screens::{ScreenDeps, ScreenRegistry};

/// Wire config, fetcher and notifier into the screens and their router.
pub fn build_state(
    config: AppConfig,
    fetcher: Arc<dyn fetch::JsonFetcher>,
    notifier: Arc<notify::NotifierMux>,
) -> AppState {
    let deps = ScreenDeps {
        config: Arc::new(config),
        fetcher,
        notifier,
    };
    AppState {
        screens: ScreenRegistry::new(deps),
    }
}

/// Build the full in-process app: config from disk/env, live HTTP fetcher,
/// notifications, and `/metrics`.
pub async fn app() -> anyhow::Result<Router> {
    let config = AppConfig::load_default()?;
    info!(
        iss_refresh_secs = config.iss_refresh_secs,
        policy = ?config.degenerate_policy,
        top_n = config.top_n,
        // Safe diagnostics: key length only
        key_len = config.nasa_api_key.len(),
        "config loaded"
    );

    let fetcher = Arc::new(fetch::HttpFetcher::new(config.request_timeout_secs));
    let notifier = Arc::new(notify::NotifierMux::from_env(config.notify_cooldown_secs));
    let state = build_state(config, fetcher, notifier);

    let metrics = telemetry::Metrics::init()?;
    Ok(api::router(state).merge(metrics.router()))
}
