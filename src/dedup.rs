// src/dedup.rs
//! Duplicate detection: groups items that cover the same story.
//!
//! Two rules produce "is-duplicate" edges:
//! - exact: equal normalized URLs (authoritative for that pair),
//! - fuzzy: normalized titles with similarity >= `similarity_threshold`.
//!
//! Edges are merged with union-find, so clustering is the transitive closure:
//! if A~B and B~C, then A, B and C share one cluster even when A and C alone
//! would not match. The fuzzy pass compares one title per URL group (the first
//! seen), which keeps it quadratic only in the count after exact collapsing.
//! Other titles in a URL group never take part in fuzzy matching, so the cluster
//! count can depend on input order when a URL group mixes unrelated titles.
//!
//! Each cluster keeps a single representative: the member whose source has the
//! highest credibility weight; ties keep the earliest member.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::credibility::CredibilityTable;
use crate::item::NewsItem;
use crate::normalize::{normalize_title, normalize_url};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// How two normalized titles are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleMetric {
    /// Alignment ratio `2 * matched_chars / total_chars` over the character sequences.
    #[default]
    Sequence,
    /// `1 - levenshtein / max_len`.
    Levenshtein,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f64,
    #[serde(default)]
    pub metric: TitleMetric,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            metric: TitleMetric::default(),
        }
    }
}

/// Similarity of two titles in [0, 1] after title normalization.
pub fn title_similarity(a: &str, b: &str, metric: TitleMetric) -> f64 {
    similarity_normalized(&normalize_title(a), &normalize_title(b), metric)
}

fn similarity_normalized(a: &str, b: &str, metric: TitleMetric) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    match metric {
        TitleMetric::Sequence => f64::from(similar::TextDiff::from_chars(a, b).ratio()),
        TitleMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
    }
}

/// One group of items judged to describe the same story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Input positions of all members, ascending.
    pub members: Vec<usize>,
    /// Input position of the chosen representative.
    pub representative: usize,
}

/// Counters describing one dedup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupReport {
    pub input: usize,
    pub clusters: usize,
    pub url_merges: usize,
    pub fuzzy_merges: usize,
}

impl DedupReport {
    pub fn removed(&self) -> usize {
        self.input.saturating_sub(self.clusters)
    }
}

/// Disjoint-set forest over input positions.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Returns false if `a` and `b` were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Cluster `items`, preserving first-seen order of clusters.
pub fn cluster_items(
    items: &[NewsItem],
    cfg: &DedupConfig,
    credibility: &CredibilityTable,
) -> (Vec<Cluster>, DedupReport) {
    let n = items.len();
    let mut report = DedupReport {
        input: n,
        ..DedupReport::default()
    };
    if n == 0 {
        return (Vec::new(), report);
    }

    let mut uf = UnionFind::new(n);

    // 1) Exact pass on normalized URLs.
    let mut leaders: Vec<usize> = Vec::new();
    let mut by_url: HashMap<String, usize> = HashMap::with_capacity(n);
    for (i, it) in items.iter().enumerate() {
        let key = normalize_url(&it.url);
        match by_url.get(&key) {
            Some(&first) => {
                if uf.union(first, i) {
                    report.url_merges += 1;
                }
                debug!(target: "dedup", id = %it.log_id(), first, i, "url match");
            }
            None => {
                by_url.insert(key, i);
                leaders.push(i);
            }
        }
    }

    // 2) Fuzzy pass over one title per URL group.
    let titles: Vec<(usize, String)> = leaders
        .iter()
        .map(|&i| (i, normalize_title(&items[i].title)))
        .collect();
    for a in 0..titles.len() {
        for b in (a + 1)..titles.len() {
            let (ia, ta) = (titles[a].0, &titles[a].1);
            let (ib, tb) = (titles[b].0, &titles[b].1);
            if uf.find(ia) == uf.find(ib) {
                continue;
            }
            let sim = similarity_normalized(ta, tb, cfg.metric);
            if sim >= cfg.similarity_threshold {
                uf.union(ia, ib);
                report.fuzzy_merges += 1;
                debug!(
                    target: "dedup",
                    a = %items[ia].log_id(),
                    b = %items[ib].log_id(),
                    similarity = sim,
                    "title match"
                );
            }
        }
    }

    // 3) Collect clusters in first-seen order.
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Cluster> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            clusters.push(Cluster {
                members: Vec::new(),
                representative: i,
            });
            clusters.len() - 1
        });
        clusters[slot].members.push(i);
    }

    // 4) Representative: highest credibility, earliest on ties.
    for c in &mut clusters {
        let mut best = c.members[0];
        let mut best_w = credibility.weight_for(&items[best].source);
        for &m in &c.members[1..] {
            let w = credibility.weight_for(&items[m].source);
            if w > best_w {
                best = m;
                best_w = w;
            }
        }
        c.representative = best;
    }

    report.clusters = clusters.len();
    info!(
        target: "dedup",
        input = report.input,
        clusters = report.clusters,
        url_merges = report.url_merges,
        fuzzy_merges = report.fuzzy_merges,
        "dedup complete"
    );
    (clusters, report)
}

/// Keep one representative per cluster, in first-seen cluster order.
/// Each representative is paired with its input position.
pub fn deduplicate(
    items: Vec<NewsItem>,
    cfg: &DedupConfig,
    credibility: &CredibilityTable,
) -> (Vec<(usize, NewsItem)>, DedupReport) {
    let (clusters, report) = cluster_items(&items, cfg, credibility);
    let mut slots: Vec<Option<NewsItem>> = items.into_iter().map(Some).collect();
    let reps = clusters
        .iter()
        .filter_map(|c| slots[c.representative].take().map(|it| (c.representative, it)))
        .collect();
    (reps, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, url: &str, source: &str) -> NewsItem {
        NewsItem::new(title, url, source)
    }

    fn run(items: &[NewsItem]) -> (Vec<Cluster>, DedupReport) {
        cluster_items(items, &DedupConfig::default(), &CredibilityTable::default_seed())
    }

    #[test]
    fn identical_titles_score_one() {
        let s = title_similarity("OpenAI announces GPT-5", "OpenAI announces GPT-5", TitleMetric::Sequence);
        assert!((s - 1.0).abs() < 1e-9);
        let s = title_similarity("OPENAI ANNOUNCES GPT-5", "openai announces gpt-5", TitleMetric::Levenshtein);
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn near_identical_titles_pass_threshold() {
        let s = title_similarity(
            "OpenAI announces GPT-5 with new features",
            "OpenAI announces GPT-5 with improved features",
            TitleMetric::Sequence,
        );
        assert!(s >= DEFAULT_SIMILARITY_THRESHOLD, "got {s}");
    }

    #[test]
    fn different_titles_stay_apart() {
        let s = title_similarity(
            "OpenAI announces GPT-5",
            "Google releases Gemini 2.0",
            TitleMetric::Sequence,
        );
        assert!(s < 0.5, "got {s}");
    }

    #[test]
    fn empty_titles() {
        assert_eq!(title_similarity("", "", TitleMetric::Sequence), 1.0);
        assert_eq!(title_similarity("abc", "", TitleMetric::Sequence), 0.0);
        assert_eq!(title_similarity("!!!", "abc", TitleMetric::Levenshtein), 0.0);
    }

    #[test]
    fn url_duplicates_merge() {
        let items = vec![
            item("Article 1", "https://example.com/article", "Test"),
            item("Article 2", "https://example.com/article/", "Test"),
        ];
        let (clusters, report) = run(&items);
        assert_eq!(clusters.len(), 1);
        assert_eq!(report.url_merges, 1);
        assert_eq!(report.fuzzy_merges, 0);
    }

    #[test]
    fn punctuation_only_difference_merges() {
        let items = vec![
            item("OpenAI announces GPT-5 today", "https://example1.com/a", "Test"),
            item("OpenAI announces GPT-5 today!", "https://example2.com/a", "Test"),
        ];
        let (clusters, report) = run(&items);
        assert_eq!(clusters.len(), 1);
        assert_eq!(report.fuzzy_merges, 1);
    }

    #[test]
    fn representative_prefers_credible_source() {
        let items = vec![
            item("OpenAI announces GPT-5", "https://example1.com/a", "Hacker News"),
            item("OpenAI announces GPT-5", "https://example2.com/a", "OpenAI Blog"),
        ];
        let (clusters, _) = run(&items);
        assert_eq!(clusters[0].representative, 1);
        assert_eq!(clusters[0].members, vec![0, 1]);
    }

    #[test]
    fn representative_tie_keeps_first() {
        let items = vec![
            item("Same story", "https://a.com/1", "Wired AI"),
            item("Same story", "https://b.com/1", "The Verge AI"),
        ];
        let (clusters, _) = run(&items);
        assert_eq!(clusters[0].representative, 0);
    }

    #[test]
    fn clusters_keep_first_seen_order() {
        let items = vec![
            item("Alpha story about chips", "https://a.com/1", "X"),
            item("Totally different news", "https://b.com/2", "X"),
            item("Alpha story about chips", "https://c.com/3", "X"),
        ];
        let (clusters, _) = run(&items);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 2]);
        assert_eq!(clusters[1].members, vec![1]);
    }

    #[test]
    fn union_find_joins_transitively() {
        let mut uf = UnionFind::new(4);
        assert!(uf.union(0, 1));
        assert!(uf.union(2, 3));
        assert!(uf.union(1, 3));
        assert!(!uf.union(0, 2));
        let r = uf.find(0);
        assert!((0..4).all(|i| uf.find(i) == r));
    }

    #[test]
    fn deduplicate_returns_representatives_with_positions() {
        let items = vec![
            item("OpenAI announces GPT-5", "https://x.com/a", "Hacker News"),
            item("Unrelated robotics news", "https://y.com/b", "Wired AI"),
            item("OpenAI announces GPT-5", "https://z.com/c", "OpenAI Blog"),
        ];
        let (reps, report) = deduplicate(
            items,
            &DedupConfig::default(),
            &CredibilityTable::default_seed(),
        );
        assert_eq!(report.removed(), 1);
        let positions: Vec<usize> = reps.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![2, 1]);
        assert_eq!(reps[0].1.source, "OpenAI Blog");
    }

    #[test]
    fn empty_input() {
        let (clusters, report) = run(&[]);
        assert!(clusters.is_empty());
        assert_eq!(report, DedupReport::default());
    }
}
