//! newsrank binary entrypoint.
//! Boots the Axum HTTP server: config resolution, niche/mode presets,
//! Prometheus exporter and the ranking routes.

use newsrank::api::{self, AppState};
use newsrank::config::{
    NicheProfile, RankingConfig, RunMode, DEFAULT_NICHES_DIR, ENV_MODE, ENV_NICHE,
    ENV_NICHES_DIR,
};
use newsrank::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - NEWSRANK_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("NEWSRANK_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rank=info,dedup=info,config=info,api=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Layer the optional niche profile and run mode named in the environment.
fn resolve_config() -> anyhow::Result<RankingConfig> {
    let mut cfg = RankingConfig::load_default()?;

    if let Ok(name) = std::env::var(ENV_NICHE) {
        let dir = std::env::var(ENV_NICHES_DIR).unwrap_or_else(|_| DEFAULT_NICHES_DIR.to_string());
        let profile = NicheProfile::load(&dir, &name)?;
        cfg = cfg.with_niche(&profile);
    }

    if let Ok(raw) = std::env::var(ENV_MODE) {
        let mode: RunMode = raw.parse()?;
        cfg = cfg.for_mode(mode);
    }

    cfg.validate()?;
    Ok(cfg)
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = resolve_config()?;
    let metrics = Metrics::init(cfg.top_n)?;

    info!(
        target: "config",
        top_n = cfg.top_n,
        threshold = cfg.dedup.similarity_threshold,
        keywords = cfg.keywords.len(),
        sources = cfg.credibility.weights.len(),
        "ranking engine ready"
    );

    let state = AppState::new(cfg)?;
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
