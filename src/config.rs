//! YAML configuration for the reconciliation pipeline.
//!
//! One file carries the scoring tunables, the catalog client settings and the
//! orchestration limits. Every section is optional and falls back to its
//! defaults; only `version` is required.
//!
//! ```yaml
//! version: "1.0"
//! name: "tmdb production"
//!
//! matcher:
//!   match_threshold: 0.85
//!   year_window: 2
//!   min_match_gap: 0.1
//!   max_results: 5
//!   weights:
//!     title: 0.55
//!     year: 0.15
//!     director: 0.15
//!     country: 0.15
//!
//! catalog:
//!   base_url: "https://api.themoviedb.org/3"
//!   language: "en-US"
//!   request_timeout: 10000
//!   retry:
//!     max_retries: 2
//!
//! orchestrator:
//!   max_candidates: 10
//!   max_detail_fetches: 5
//!   detail_min_title_similarity: 0.3
//!   year_hint_spread: 1
//!   batch_concurrency: 8
//! ```
//!
//! Credentials are not read from this file by the server; they come from the
//! environment so the YAML can be committed.

use std::fs;
use std::path::Path;

use catalog::CatalogConfig;
use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ReconcileError;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

impl ReconcileConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ReconcileConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Version, scoring and orchestration checks. Catalog settings are
    /// checked when the client is built, once credentials are in place.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))?;
        self.orchestrator
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))?;
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            matcher: MatchConfig::default(),
            catalog: CatalogConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

/// Limits on catalog traffic per query and per batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorConfig {
    /// Candidates kept after merging all searches.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Detail lookups issued per query at most.
    #[serde(default = "default_max_detail_fetches")]
    pub max_detail_fetches: usize,

    /// Title similarity a candidate needs before its detail is fetched.
    #[serde(default = "default_detail_min_title_similarity")]
    pub detail_min_title_similarity: f64,

    /// Extra years searched on each side of a stated year.
    #[serde(default = "default_year_hint_spread")]
    pub year_hint_spread: u32,

    /// Queries of a batch in flight at once.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.max_candidates == 0 {
            return Err(ReconcileError::InvalidConfig(
                "max_candidates must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detail_min_title_similarity) {
            return Err(ReconcileError::InvalidConfig(format!(
                "detail_min_title_similarity must be in [0, 1], got {}",
                self.detail_min_title_similarity
            )));
        }
        if self.year_hint_spread > 5 {
            return Err(ReconcileError::InvalidConfig(format!(
                "year_hint_spread must be <= 5, got {}",
                self.year_hint_spread
            )));
        }
        if self.batch_concurrency == 0 {
            return Err(ReconcileError::InvalidConfig(
                "batch_concurrency must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            max_detail_fetches: default_max_detail_fetches(),
            detail_min_title_similarity: default_detail_min_title_similarity(),
            year_hint_spread: default_year_hint_spread(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

fn default_max_candidates() -> usize {
    10
}
fn default_max_detail_fetches() -> usize {
    5
}
fn default_detail_min_title_similarity() -> f64 {
    0.3
}
fn default_year_hint_spread() -> u32 {
    1
}
fn default_batch_concurrency() -> usize {
    8
}
