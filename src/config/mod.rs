// src/config/mod.rs
//! Ranking configuration: TOML file + env overrides + built-in defaults.
//!
//! Resolution for [`RankingConfig::load_default`]:
//! 1. `NEWSRANK_CONFIG_PATH` if set (a missing file is an error),
//! 2. `config/ranking.toml` if present,
//! 3. built-in defaults.
//!
//! Afterwards `NEWSRANK_TOP_N` and `NEWSRANK_SIMILARITY_THRESHOLD` override the
//! loaded values (threshold clamped to `[0, 1]`, unparsable values ignored).

pub mod niche;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::credibility::CredibilityTable;
use crate::dedup::DedupConfig;
use crate::scoring::ScoringConfig;
use crate::signals::default_keywords;

pub use niche::{NicheProfile, DEFAULT_NICHES_DIR};

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/ranking.toml";
pub const DEFAULT_TOP_N: usize = 10;

pub const ENV_CONFIG_PATH: &str = "NEWSRANK_CONFIG_PATH";
pub const ENV_TOP_N: &str = "NEWSRANK_TOP_N";
pub const ENV_SIMILARITY_THRESHOLD: &str = "NEWSRANK_SIMILARITY_THRESHOLD";
pub const ENV_NICHE: &str = "NEWSRANK_NICHE";
pub const ENV_NICHES_DIR: &str = "NEWSRANK_NICHES_DIR";
pub const ENV_MODE: &str = "NEWSRANK_MODE";

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
    pub keywords: Vec<String>,
    pub dedup: DedupConfig,
    pub scoring: ScoringConfig,
    pub credibility: CredibilityTable,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            keywords: default_keywords(),
            dedup: DedupConfig::default(),
            scoring: ScoringConfig::default(),
            credibility: CredibilityTable::default_seed(),
        }
    }
}

/// Lookback presets. Recency decays linearly across the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Daily,
    Realtime,
    Weekly,
}

impl RunMode {
    pub fn lookback_hours(self) -> u32 {
        match self {
            RunMode::Daily => 24,
            RunMode::Realtime => 1,
            RunMode::Weekly => 168,
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RunMode::Daily),
            "realtime" => Ok(RunMode::Realtime),
            "weekly" => Ok(RunMode::Weekly),
            other => Err(anyhow::anyhow!("unknown run mode `{other}`")),
        }
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

// parse optional positive integer env
fn parse_top_n_env(raw: Option<String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

impl RankingConfig {
    /// Parse from a TOML string; absent sections keep their defaults.
    ///
    /// Credibility entries in the TOML are layered over the built-in seed.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: RankingConfig =
            toml::from_str(toml_str).context("parse ranking config TOML")?;

        let has_cred_section = toml::from_str::<toml::Table>(toml_str)
            .map(|t| t.contains_key("credibility"))
            .unwrap_or(false);
        if has_cred_section {
            let overlay = std::mem::replace(&mut cfg.credibility, CredibilityTable::default_seed());
            cfg.credibility.merge(&overlay);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("read ranking config at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("load ranking config from {}", path.display()))
    }

    /// Resolve file (env → default path → built-ins), then apply env overrides.
    pub fn load_default() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => Self::from_path(PathBuf::from(p))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_path(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => {
                info!(target: "config", "no ranking config file, using built-in defaults");
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(n) = parse_top_n_env(std::env::var(ENV_TOP_N).ok()) {
            self.top_n = n;
        } else if std::env::var(ENV_TOP_N).is_ok() {
            warn!(target: "config", "ignoring invalid {}", ENV_TOP_N);
        }

        if let Some(t) = parse_threshold_env(std::env::var(ENV_SIMILARITY_THRESHOLD).ok()) {
            self.dedup.similarity_threshold = t;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let t = self.dedup.similarity_threshold;
        if !(0.0..=1.0).contains(&t) {
            anyhow::bail!("similarity_threshold must be within [0, 1], got {t}");
        }
        if self.top_n == 0 {
            anyhow::bail!("top_n must be at least 1");
        }
        if let Some(w) = self.scoring.recency_window_hours {
            if !(w.is_finite() && w > 0.0) {
                anyhow::bail!("recency_window_hours must be positive, got {w}");
            }
        }
        Ok(())
    }

    /// Switch to a niche: its keywords replace ours, its credibility entries overlay ours.
    pub fn with_niche(mut self, profile: &NicheProfile) -> Self {
        if !profile.keywords.is_empty() {
            self.keywords = profile.keywords.clone();
        }
        if let Some(cred) = &profile.credibility {
            self.credibility.merge(cred);
        }
        info!(
            target: "config",
            niche = %profile.name,
            keywords = self.keywords.len(),
            "niche profile applied"
        );
        self
    }

    /// Apply a lookback preset to recency scoring.
    pub fn for_mode(mut self, mode: RunMode) -> Self {
        self.scoring.recency_window_hours = Some(f64::from(mode.lookback_hours()));
        self
    }
}
