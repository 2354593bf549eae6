// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod credibility;
pub mod dedup;
pub mod item;
pub mod metrics;
pub mod normalize;
pub mod rank;
pub mod scoring;
pub mod signals;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::{NicheProfile, RankingConfig, RunMode};
pub use crate::item::NewsItem;
pub use crate::rank::{select, RankingEngine, Selection};
