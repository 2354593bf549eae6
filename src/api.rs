// src/api.rs
//! HTTP surface over the ranking engine.
//!
//! - `GET  /health`                      → `OK`
//! - `POST /rank`                        → `{ items, report }`
//! - `POST /debug/explain`               → per-factor score breakdown for one item
//! - `GET  /debug/credibility?source=..` → plain-text weight lookup
//! - `GET  /debug/config`                → active configuration as JSON

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::RankingConfig;
use crate::item::NewsItem;
use crate::rank::{RankingEngine, Selection};
use crate::scoring::ScoreBreakdown;

/// Shared state: the immutable engine plus the config it was built from.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RankingEngine>,
    pub config: Arc<RankingConfig>,
}

impl AppState {
    pub fn new(config: RankingConfig) -> anyhow::Result<Self> {
        let engine = RankingEngine::new(&config)?;
        Ok(Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        })
    }

    /// Config resolved from env/file/defaults (see [`RankingConfig::load_default`]).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(RankingConfig::load_default()?)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/rank", post(rank))
        .route("/debug/explain", post(debug_explain))
        .route("/debug/credibility", get(debug_credibility))
        .route("/debug/config", get(debug_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RankReq {
    pub items: Vec<NewsItem>,
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Reference time for recency; server clock when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

async fn rank(State(state): State<AppState>, Json(body): Json<RankReq>) -> Json<Selection> {
    let top_n = body.top_n.unwrap_or(state.config.top_n);
    let now = body.now.unwrap_or_else(Utc::now);
    let n_in = body.items.len();

    let sel = state.engine.select_with_report(body.items, top_n, now);

    info!(target: "api", n_in, top_n, n_out = sel.items.len(), "POST /rank");
    Json(sel)
}

#[derive(Debug, Deserialize)]
pub struct ExplainReq {
    pub item: NewsItem,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct ExplainResp {
    total: u32,
    breakdown: ScoreBreakdown,
}

async fn debug_explain(
    State(state): State<AppState>,
    Json(body): Json<ExplainReq>,
) -> Json<ExplainResp> {
    let now = body.now.unwrap_or_else(Utc::now);
    let breakdown = state.engine.explain(&body.item, now);
    Json(ExplainResp {
        total: breakdown.total(),
        breakdown,
    })
}

async fn debug_credibility(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> String {
    let s = q.get("source").cloned().unwrap_or_default();
    let table = state.engine.credibility();
    let w = table.weight_for(&s);
    let kind = if table.is_known(&s) { "known" } else { "fallback" };
    format!("source='{}' -> weight={} ({})", s, w, kind)
}

async fn debug_config(State(state): State<AppState>) -> Json<RankingConfig> {
    Json(state.config.as_ref().clone())
}
