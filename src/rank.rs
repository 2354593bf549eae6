// src/rank.rs
//! Ranker/selector: dedup → score → sort → truncate.
//!
//! Ordering is by score descending, then more recent `published_at` (missing
//! timestamps sort as oldest), then input position of the representative.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RankingConfig;
use crate::credibility::CredibilityTable;
use crate::dedup::{deduplicate, DedupConfig, DedupReport};
use crate::item::NewsItem;
use crate::scoring::{ScoreBreakdown, Scorer};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("rank_runs_total", "Ranking runs executed.");
        describe_counter!("rank_items_in_total", "Raw items handed to the ranker.");
        describe_counter!("rank_items_out_total", "Items emitted after truncation.");
        describe_counter!(
            "dedup_url_merges_total",
            "Items merged by normalized URL."
        );
        describe_counter!(
            "dedup_fuzzy_merges_total",
            "Groups merged by title similarity."
        );
        describe_histogram!("rank_duration_ms", "Ranking run time in milliseconds.");
    });
}

/// Ranked output plus the dedup counters of the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub items: Vec<NewsItem>,
    pub report: DedupReport,
}

/// Immutable engine: one dedup config and one scorer. Safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    dedup: DedupConfig,
    scorer: Scorer,
}

impl RankingEngine {
    pub fn new(cfg: &RankingConfig) -> anyhow::Result<Self> {
        let scorer = Scorer::new(cfg.scoring.clone(), cfg.credibility.clone(), &cfg.keywords)?;
        Ok(Self::from_parts(cfg.dedup.clone(), scorer))
    }

    pub fn from_parts(dedup: DedupConfig, scorer: Scorer) -> Self {
        Self { dedup, scorer }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn credibility(&self) -> &CredibilityTable {
        self.scorer.credibility()
    }

    /// At most `top_n` deduplicated items, best first, each with `score` set.
    pub fn select(&self, items: Vec<NewsItem>, top_n: usize, now: DateTime<Utc>) -> Vec<NewsItem> {
        self.select_with_report(items, top_n, now).items
    }

    pub fn select_with_report(
        &self,
        items: Vec<NewsItem>,
        top_n: usize,
        now: DateTime<Utc>,
    ) -> Selection {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();
        let input = items.len();

        if top_n == 0 || items.is_empty() {
            counter!("rank_runs_total").increment(1);
            counter!("rank_items_in_total").increment(input as u64);
            return Selection {
                items: Vec::new(),
                report: DedupReport {
                    input,
                    ..DedupReport::default()
                },
            };
        }

        let (reps, report) = deduplicate(items, &self.dedup, self.scorer.credibility());

        let mut scored: Vec<(usize, u32, NewsItem)> = reps
            .into_iter()
            .map(|(pos, mut it)| {
                let s = self.scorer.score(&it, now);
                it.score = Some(s);
                (pos, s, it)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| b.2.published_at.cmp(&a.2.published_at))
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_n);

        let out: Vec<NewsItem> = scored.into_iter().map(|(_, _, it)| it).collect();

        counter!("rank_runs_total").increment(1);
        counter!("rank_items_in_total").increment(input as u64);
        counter!("rank_items_out_total").increment(out.len() as u64);
        counter!("dedup_url_merges_total").increment(report.url_merges as u64);
        counter!("dedup_fuzzy_merges_total").increment(report.fuzzy_merges as u64);
        histogram!("rank_duration_ms").record(t0.elapsed().as_secs_f64() * 1000.0);

        info!(
            target: "rank",
            input,
            clusters = report.clusters,
            selected = out.len(),
            top = out.first().and_then(|i| i.score).unwrap_or(0),
            bottom = out.last().and_then(|i| i.score).unwrap_or(0),
            "ranking complete"
        );

        Selection { items: out, report }
    }

    /// Score breakdown for a single item, without dedup.
    pub fn explain(&self, item: &NewsItem, now: DateTime<Utc>) -> ScoreBreakdown {
        self.scorer.breakdown(item, now)
    }
}

/// Convenience wrapper using the built-in configuration.
pub fn select(items: Vec<NewsItem>, top_n: usize, now: DateTime<Utc>) -> Vec<NewsItem> {
    RankingEngine::default().select(items, top_n, now)
}
