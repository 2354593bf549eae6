// src/config/niche.rs
//! Niche profiles: named keyword/credibility variants stored as
//! `<dir>/<name>.toml`.
//!
//! ```toml
//! name = "AI jobs (AU)"
//! description = "Hiring and workforce news"
//! keywords = ["hiring", "layoffs", "salary"]
//!
//! [credibility]
//! default_weight = 4
//! [credibility.weights]
//! "Seek Blog" = 16
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::credibility::CredibilityTable;

pub const DEFAULT_NICHES_DIR: &str = "niches";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Replaces the scoring keywords when non-empty.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Overlaid onto the active credibility table.
    #[serde(default)]
    pub credibility: Option<CredibilityTable>,
}

impl NicheProfile {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let p: NicheProfile = toml::from_str(s).context("parse niche profile TOML")?;
        if p.name.trim().is_empty() {
            anyhow::bail!("niche profile needs a non-empty `name`");
        }
        Ok(p)
    }

    /// Load `<dir>/<name>.toml`.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> anyhow::Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            anyhow::bail!("invalid niche name `{name}`");
        }
        let path = dir.as_ref().join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).with_context(|| {
            format!(
                "niche `{name}` not found at {} (available: {})",
                path.display(),
                Self::list_available(dir.as_ref()).join(", ")
            )
        })?;
        Self::from_toml_str(&content).with_context(|| format!("load niche `{name}`"))
    }

    /// File stems of `*.toml` files in `dir`, sorted. Missing dir → empty.
    pub fn list_available(dir: impl AsRef<Path>) -> Vec<String> {
        let Ok(entries) = fs::read_dir(dir.as_ref()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|x| x == "toml"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }
}
