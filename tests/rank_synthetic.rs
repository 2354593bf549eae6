//! Synthetic ranking suite: programmatically built corpora, shuffled with a
//! seeded RNG, checked for order independence, bounds and truncation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use newsrank::{NewsItem, RankingEngine};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const STORIES: &[&str] = &[
    "Chipmaker unveils faster accelerator",
    "Senate debates new privacy rules",
    "Open model tops coding leaderboard",
    "Robotics startup demos warehouse arm",
    "Researchers map protein folding errors",
    "Cloud outage hits streaming services",
    "University opens ethics institute",
    "Satellite imagery tool goes public",
    "Voice assistant adds offline mode",
    "Hospital pilots triage scheduler",
    "Game studio trains NPC dialogue",
    "Bank flags fraud with graph search",
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

/// Three variants per story: same title modulo case/punctuation, URLs that
/// normalize differently, and exactly one top-credibility source.
fn corpus() -> Vec<NewsItem> {
    let mut out = Vec::new();
    for (k, title) in STORIES.iter().enumerate() {
        let at = now() - Duration::hours(k as i64);
        out.push(
            NewsItem::new(*title, format!("https://news{k}.example/story"), "Hacker News")
                .published(at),
        );
        out.push(
            NewsItem::new(
                title.to_uppercase(),
                format!("https://www.news{k}.example/story/?utm_source=feed"),
                "OpenAI Blog",
            )
            .published(at),
        );
        out.push(
            NewsItem::new(format!("{title}!"), format!("https://mirror.example/{k}"), "Wired AI")
                .published(at - Duration::minutes(30)),
        );
    }
    out
}

#[test]
fn selection_is_independent_of_input_order() {
    let engine = RankingEngine::default();
    let baseline = engine.select(corpus(), 50, now());
    assert_eq!(baseline.len(), STORIES.len());
    assert!(baseline.iter().all(|i| i.source == "OpenAI Blog"));

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut items = corpus();
        items.shuffle(&mut rng);
        let out = engine.select(items, 50, now());
        let urls: Vec<&str> = out.iter().map(|i| i.url.as_str()).collect();
        let base: Vec<&str> = baseline.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, base);
    }
}

#[test]
fn truncation_matches_cluster_count() {
    let engine = RankingEngine::default();
    let mut rng = StdRng::seed_from_u64(7);
    for top_n in [0usize, 1, 5, 12, 13, 100] {
        let mut items = corpus();
        items.shuffle(&mut rng);
        let out = engine.select(items, top_n, now());
        assert_eq!(out.len(), top_n.min(STORIES.len()), "top_n={top_n}");
    }
}

#[test]
fn random_corpora_respect_bounds_and_order() {
    let vocab = [
        "release", "launch", "$2B", "40%", "2025", "AGI", "robot", "quiet", "update",
        "safety", "policy", "300 users", "March 3", "lab", "team", "notes",
    ];
    let sources = [
        "OpenAI Blog", "arXiv", "Hacker News", "Wired AI", "Unknown", "HN", "r/artificial",
    ];
    let engine = RankingEngine::default();
    let mut rng = StdRng::seed_from_u64(2024);

    for round in 0..25 {
        let n = rng.random_range(0..40);
        let items: Vec<NewsItem> = (0..n)
            .map(|i| {
                let words: Vec<&str> = (0..rng.random_range(2..9))
                    .map(|_| vocab[rng.random_range(0..vocab.len())])
                    .collect();
                let mut it = NewsItem::new(
                    format!("{} #{round}-{i}", words.join(" ")),
                    format!("https://s{}.example/{}", rng.random_range(0..6), rng.random_range(0..10)),
                    sources[rng.random_range(0..sources.len())],
                );
                if rng.random_bool(0.8) {
                    it = it.published(now() - Duration::minutes(rng.random_range(-120..4000)));
                }
                it
            })
            .collect();

        let top_n = rng.random_range(0..15);
        let sel = engine.select_with_report(items, top_n, now());
        assert!(sel.items.len() <= top_n);
        assert!(sel.items.len() <= sel.report.clusters);
        for it in &sel.items {
            let s = it.score.expect("scored");
            assert!(s <= 75, "round {round}: score {s}");
        }
        for w in sel.items.windows(2) {
            assert!(w[0].score >= w[1].score, "round {round}: not sorted");
        }
    }
}
