//! Relevance scoring for deduplicated items.
//!
//! Four independent factors, each capped before summation:
//! - `recency`     (0–30): `max(0, 30 - whole_hours_since_published)`
//! - `credibility` (0–20): credibility table lookup, fallback for unknown sources
//! - `numeric`     (0–10): `numeric_points` per numeric signal hit
//! - `keyword`     (0–15): `keyword_points` per distinct keyword present
//!
//! With default caps the total is bounded by 75 by construction, no final clamp.
//! Scoring is a pure function of the item, the reference time and the config.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credibility::CredibilityTable;
use crate::item::NewsItem;
use crate::normalize::clean_text;
use crate::signals::{default_numeric_patterns, KeywordMatcher, NumericSignals};

/// Per-factor caps and increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub max_recency: u32,
    pub max_credibility: u32,
    pub max_numeric: u32,
    pub max_keyword: u32,
    pub numeric_points: u32,
    pub keyword_points: u32,
    /// When set, recency decays linearly over this lookback window instead of
    /// one point per hour.
    pub recency_window_hours: Option<f64>,
    pub numeric_patterns: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_recency: 30,
            max_credibility: 20,
            max_numeric: 10,
            max_keyword: 15,
            numeric_points: 3,
            keyword_points: 3,
            recency_window_hours: None,
            numeric_patterns: default_numeric_patterns(),
        }
    }
}

impl ScoringConfig {
    /// Highest total reachable with these caps.
    pub fn max_total(&self) -> u32 {
        self.max_recency + self.max_credibility + self.max_numeric + self.max_keyword
    }
}

/// Explainable result: every factor plus what triggered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub recency: u32,
    pub credibility: u32,
    pub numeric: u32,
    pub keyword: u32,
    pub numeric_hits: Vec<String>,
    pub keyword_hits: Vec<String>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.recency + self.credibility + self.numeric + self.keyword
    }
}

/// Recency points for a publication time relative to `now`.
///
/// Future timestamps count as zero hours old; a missing timestamp scores 0.
pub fn recency_points(
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    max: u32,
    window_hours: Option<f64>,
) -> u32 {
    let Some(published) = published_at else {
        return 0;
    };
    let age = now.signed_duration_since(published);

    match window_hours {
        Some(window) if window > 0.0 => {
            let hours = (age.num_seconds().max(0) as f64) / 3600.0;
            let frac = (1.0 - hours / window).clamp(0.0, 1.0);
            (f64::from(max) * frac).floor() as u32
        }
        _ => {
            let hours = age.num_hours().max(0);
            let hours = u32::try_from(hours).unwrap_or(u32::MAX);
            max.saturating_sub(hours)
        }
    }
}

/// Scorer bound to one immutable configuration.
#[derive(Debug, Clone)]
pub struct Scorer {
    cfg: ScoringConfig,
    credibility: CredibilityTable,
    numeric: NumericSignals,
    keywords: KeywordMatcher,
}

impl Scorer {
    pub fn new(
        cfg: ScoringConfig,
        credibility: CredibilityTable,
        keywords: &[String],
    ) -> anyhow::Result<Self> {
        let numeric = NumericSignals::compile(&cfg.numeric_patterns)?;
        let keywords = KeywordMatcher::compile(keywords)?;
        Ok(Self {
            cfg,
            credibility,
            numeric,
            keywords,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.cfg
    }

    pub fn credibility(&self) -> &CredibilityTable {
        &self.credibility
    }

    /// Total score, in `[0, cfg.max_total()]`.
    pub fn score(&self, item: &NewsItem, now: DateTime<Utc>) -> u32 {
        self.breakdown(item, now).total()
    }

    pub fn breakdown(&self, item: &NewsItem, now: DateTime<Utc>) -> ScoreBreakdown {
        let c = &self.cfg;
        let text = clean_text(&item.signal_text());

        let recency = recency_points(item.published_at, now, c.max_recency, c.recency_window_hours);
        let credibility = self.credibility.weight_for(&item.source).min(c.max_credibility);

        let numeric_hits = self.numeric.find(&text);
        let numeric = capped(numeric_hits.len(), c.numeric_points, c.max_numeric);

        let keyword_hits = self.keywords.find(&text);
        let keyword = capped(keyword_hits.len(), c.keyword_points, c.max_keyword);

        let b = ScoreBreakdown {
            recency,
            credibility,
            numeric,
            keyword,
            numeric_hits,
            keyword_hits,
        };
        debug!(
            target: "scoring",
            id = %item.log_id(),
            recency = b.recency,
            credibility = b.credibility,
            numeric = b.numeric,
            keyword = b.keyword,
            total = b.total(),
            "scored"
        );
        b
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            cfg: ScoringConfig::default(),
            credibility: CredibilityTable::default_seed(),
            numeric: NumericSignals::default(),
            keywords: KeywordMatcher::default(),
        }
    }
}

fn capped(hits: usize, points: u32, cap: u32) -> u32 {
    let hits = u32::try_from(hits).unwrap_or(u32::MAX);
    hits.saturating_mul(points).min(cap)
}
