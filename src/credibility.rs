//! # Source Credibility
//!
//! Static mapping from a news source (e.g. "OpenAI Blog", "arXiv", "Hacker News")
//! to an integer credibility weight.
//!
//! - Case-insensitive lookup with normalization of punctuation, dashes, etc.
//! - Aliases map alternative spellings ("TechCrunch", "HN") to canonical sources.
//! - Fallback order: aliases → exact match → longest contained key → default.
//! - `default_seed()` carries the built-in table for AI news.
//!
//! Keys are stored normalized and ordered, so lookups are deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight used for sources absent from the table.
pub const DEFAULT_FALLBACK_WEIGHT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCredibility")]
pub struct CredibilityTable {
    /// Weight if no match is found.
    pub default_weight: u32,
    /// Explicit weights for canonical source names (normalized keys).
    pub weights: BTreeMap<String, u32>,
    /// Aliases mapping non-canonical names → canonical names (normalized both sides).
    pub aliases: BTreeMap<String, String>,
}

/// Deserialization shape; keys may be written in display form.
#[derive(Debug, Deserialize)]
struct RawCredibility {
    #[serde(default = "default_default_weight")]
    default_weight: u32,
    #[serde(default)]
    weights: BTreeMap<String, u32>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

fn default_default_weight() -> u32 {
    DEFAULT_FALLBACK_WEIGHT
}

impl From<RawCredibility> for CredibilityTable {
    fn from(raw: RawCredibility) -> Self {
        Self::new(raw.default_weight, raw.weights, raw.aliases)
    }
}

impl Default for CredibilityTable {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl CredibilityTable {
    pub fn new<W, A>(default_weight: u32, weights: W, aliases: A) -> Self
    where
        W: IntoIterator<Item = (String, u32)>,
        A: IntoIterator<Item = (String, String)>,
    {
        Self {
            default_weight,
            weights: weights
                .into_iter()
                .map(|(k, v)| (normalize(&k), v))
                .filter(|(k, _)| !k.is_empty())
                .collect(),
            aliases: aliases
                .into_iter()
                .map(|(a, c)| (normalize(&a), normalize(&c)))
                .filter(|(a, _)| !a.is_empty())
                .collect(),
        }
    }

    /// Get the weight for a given source name.
    ///
    /// Steps:
    /// 1. Alias lookup (normalized) → canonical → weight.
    /// 2. Exact weight match.
    /// 3. Longest key contained in the source (e.g. "arXiv cs.AI" → "arxiv").
    /// 4. Default weight.
    pub fn weight_for(&self, source: &str) -> u32 {
        let s = normalize(source);
        if s.is_empty() {
            return self.default_weight;
        }

        if let Some(canon) = self.aliases.get(&s) {
            if let Some(&w) = self.weights.get(canon) {
                return w;
            }
        }

        if let Some(&w) = self.weights.get(&s) {
            return w;
        }

        // Whole-word containment only, so "wired" never matches inside "rewired".
        let padded = format!(" {s} ");
        self.weights
            .iter()
            .filter(|(k, _)| padded.contains(&format!(" {k} ")))
            .max_by_key(|(k, _)| k.len())
            .map(|(_, &w)| w)
            .unwrap_or(self.default_weight)
    }

    /// Whether the source resolves to an explicit entry (not the fallback).
    pub fn is_known(&self, source: &str) -> bool {
        let s = normalize(source);
        self.aliases.contains_key(&s) || self.weights.contains_key(&s) || {
            let padded = format!(" {s} ");
            self.weights.keys().any(|k| padded.contains(&format!(" {k} ")))
        }
    }

    /// Overlay another table: its weights and aliases win, its default replaces ours.
    pub fn merge(&mut self, other: &CredibilityTable) {
        self.default_weight = other.default_weight;
        self.weights
            .extend(other.weights.iter().map(|(k, v)| (k.clone(), *v)));
        self.aliases
            .extend(other.aliases.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Built-in seed for AI news sources.
    pub fn default_seed() -> Self {
        let weights = [
            ("OpenAI Blog", 20),
            ("Anthropic Blog", 20),
            ("DeepMind Blog", 20),
            ("arXiv", 18),
            ("MIT Tech Review AI", 15),
            ("TechCrunch AI", 12),
            ("The Verge AI", 10),
            ("Ars Technica AI", 10),
            ("Wired AI", 10),
            ("Reddit r/MachineLearning", 10),
            ("Reddit r/artificial", 8),
            ("Hacker News", 8),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v));

        let aliases = [
            ("OpenAI", "OpenAI Blog"),
            ("Anthropic", "Anthropic Blog"),
            ("DeepMind", "DeepMind Blog"),
            ("Google DeepMind", "DeepMind Blog"),
            ("MIT Technology Review", "MIT Tech Review AI"),
            ("TechCrunch", "TechCrunch AI"),
            ("The Verge", "The Verge AI"),
            ("Ars Technica", "Ars Technica AI"),
            ("Wired", "Wired AI"),
            ("r/MachineLearning", "Reddit r/MachineLearning"),
            ("r/artificial", "Reddit r/artificial"),
            ("HN", "Hacker News"),
        ]
        .into_iter()
        .map(|(a, c)| (a.to_string(), c.to_string()));

        Self::new(DEFAULT_FALLBACK_WEIGHT, weights, aliases)
    }
}

/// Normalize input string: lowercase, replace punctuation/dashes with spaces,
/// collapse multiple spaces into one.
fn normalize(s: &str) -> String {
    let mut out = s.trim().to_lowercase();

    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }

    out = out.replace(['\n', '\r', '\t', '.', ',', '‚', '’', '\''], " ");

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
