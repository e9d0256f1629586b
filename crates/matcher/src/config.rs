use serde::{Deserialize, Serialize};

use crate::types::MatchError;

/// Relative weight of each field in the composite score.
///
/// Only the weights of participating fields are used, and they are
/// renormalized per candidate, so the absolute values only matter relative to
/// each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldWeights {
    #[serde(default = "FieldWeights::default_title")]
    pub title: f64,
    #[serde(default = "FieldWeights::default_secondary")]
    pub year: f64,
    #[serde(default = "FieldWeights::default_secondary")]
    pub director: f64,
    #[serde(default = "FieldWeights::default_secondary")]
    pub country: f64,
}

impl FieldWeights {
    fn default_title() -> f64 {
        0.55
    }

    fn default_secondary() -> f64 {
        0.15
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            year: Self::default_secondary(),
            director: Self::default_secondary(),
            country: Self::default_secondary(),
        }
    }
}

/// Scoring and ranking knobs.
///
/// `MatchConfig` is cheap to clone and serde-friendly so it can be embedded in
/// the pipeline YAML config or passed per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    #[serde(default)]
    pub weights: FieldWeights,
    /// Composite score a candidate must reach (inclusive) to be auto-matched.
    #[serde(default = "MatchConfig::default_match_threshold")]
    pub match_threshold: f64,
    /// Maximum year distance allowed for an auto-match when a year is supplied.
    #[serde(default = "MatchConfig::default_year_window")]
    pub year_window: u32,
    /// Distance in years at which the year similarity reaches zero.
    #[serde(default = "MatchConfig::default_year_decay_span")]
    pub year_decay_span: u32,
    /// Title similarity below this value is reported as 0.0.
    #[serde(default = "MatchConfig::default_title_floor")]
    pub title_floor: f64,
    /// Value a field matcher reports when one side has no data.
    #[serde(default = "MatchConfig::default_neutral_score")]
    pub neutral_score: f64,
    /// Lead the auto-match needs over the best other candidate.
    #[serde(default = "MatchConfig::default_min_match_gap")]
    pub min_match_gap: f64,
    /// Top-N returned per query.
    #[serde(default = "MatchConfig::default_max_results")]
    pub max_results: usize,
}

impl MatchConfig {
    pub(crate) fn default_match_threshold() -> f64 {
        0.85
    }

    pub(crate) fn default_year_window() -> u32 {
        2
    }

    pub(crate) fn default_year_decay_span() -> u32 {
        3
    }

    pub(crate) fn default_title_floor() -> f64 {
        0.3
    }

    pub(crate) fn default_neutral_score() -> f64 {
        0.5
    }

    pub(crate) fn default_min_match_gap() -> f64 {
        0.1
    }

    pub(crate) fn default_max_results() -> usize {
        5
    }

    /// Same config with a different top-N.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Validate the configuration before it reaches the scorer.
    pub fn validate(&self) -> Result<(), MatchError> {
        let weights = [
            ("title", self.weights.title),
            ("year", self.weights.year),
            ("director", self.weights.director),
            ("country", self.weights.country),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "weights.{name} must be a non-negative number"
                )));
            }
        }
        if self.weights.title <= 0.0 {
            return Err(MatchError::InvalidConfig(
                "weights.title must be greater than zero".into(),
            ));
        }
        for (name, value) in [
            ("match_threshold", self.match_threshold),
            ("title_floor", self.title_floor),
            ("neutral_score", self.neutral_score),
            ("min_match_gap", self.min_match_gap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }
        if self.year_decay_span == 0 {
            return Err(MatchError::InvalidConfig(
                "year_decay_span must be greater than zero".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(MatchError::InvalidConfig(
                "max_results must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            match_threshold: Self::default_match_threshold(),
            year_window: Self::default_year_window(),
            year_decay_span: Self::default_year_decay_span(),
            title_floor: Self::default_title_floor(),
            neutral_score: Self::default_neutral_score(),
            min_match_gap: Self::default_min_match_gap(),
            max_results: Self::default_max_results(),
        }
    }
}
