// src/signals.rs
//! Pattern-based content signals: concrete numbers and high-value keywords.
//!
//! No NLP here. Numeric signals are regex hits (each pattern counted on its own,
//! so "$10B" is both a monetary amount and an abbreviated magnitude). Keywords
//! match case-insensitively at a word start, so "launch" also hits "launches"
//! while "agi" does not fire inside "imagine".

use anyhow::Context;
use regex::Regex;

/// Built-in numeric patterns (all case-insensitive).
pub const DEFAULT_NUMERIC_PATTERNS: &[&str] = &[
    // Monetary amounts: $10B, $1,200, $3.5M
    r"(?i)\$[\d,]+(?:\.\d+)?[bmk]?",
    // Abbreviated magnitudes: 5B, 100M, 2.5K
    r"(?i)\b\d+(?:\.\d+)?[bmk]\b",
    // Four-digit numbers (years)
    r"\b\d{4}\b",
    // Percentages
    r"\d+(?:\.\d+)?%",
    // Counts of concrete units
    r"(?i)\b\d[\d,]*\s+(?:users|customers|parameters|tokens|gpus|employees|downloads|models|papers|countries|languages|jobs)\b",
    // Month-day dates: Jan 5, September 12th
    r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?\b",
    // ISO dates
    r"\b\d{4}-\d{2}-\d{2}\b",
];

/// Built-in high-value keywords for AI news.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "release",
    "launch",
    "benchmark",
    "acquisition",
    "policy",
    "compute",
    "robot",
    "AGI",
    "breakthrough",
    "billion",
    "million",
    "partnership",
    "regulation",
    "safety",
    "alignment",
];

pub fn default_numeric_patterns() -> Vec<String> {
    DEFAULT_NUMERIC_PATTERNS.iter().map(|s| s.to_string()).collect()
}

pub fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

/// Compiled numeric patterns.
#[derive(Debug, Clone)]
pub struct NumericSignals {
    patterns: Vec<Regex>,
}

impl NumericSignals {
    pub fn compile(patterns: &[String]) -> anyhow::Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("numeric pattern `{p}`")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// All hits across all patterns, in pattern order.
    pub fn find(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| m.as_str().to_string()))
            .collect()
    }
}

impl Default for NumericSignals {
    fn default() -> Self {
        Self::compile(&default_numeric_patterns()).expect("built-in numeric patterns")
    }
}

/// Compiled keyword list; each keyword counts at most once per text.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<(String, Regex)>,
}

impl KeywordMatcher {
    pub fn compile(keywords: &[String]) -> anyhow::Result<Self> {
        let mut out: Vec<(String, Regex)> = Vec::with_capacity(keywords.len());
        for kw in keywords {
            let kw = kw.trim();
            if kw.is_empty() || out.iter().any(|(k, _)| k.eq_ignore_ascii_case(kw)) {
                continue;
            }
            let re = Regex::new(&format!(r"(?i)(?:^|\W){}", regex::escape(kw)))
                .with_context(|| format!("keyword `{kw}`"))?;
            out.push((kw.to_string(), re));
        }
        Ok(Self { keywords: out })
    }

    /// Keywords present in `text`, in configured order.
    pub fn find(&self, text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::compile(&default_keywords()).expect("built-in keywords")
    }
}
