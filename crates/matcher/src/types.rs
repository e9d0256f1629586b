use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A candidate film description to reconcile against the catalog.
///
/// Optional fields are present only when the calling tool's column mapping
/// supplied them. `country` may hold several comma-separated co-production
/// countries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Query {
    /// Title-only query.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            director: None,
            country: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Blank director strings count as not supplied.
    pub fn supplies_director(&self) -> bool {
        self.director.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Blank country strings count as not supplied.
    pub fn supplies_country(&self) -> bool {
        self.country.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Whether scoring this query needs per-candidate detail from the catalog.
    pub fn needs_detail(&self) -> bool {
        self.supplies_director() || self.supplies_country()
    }

    /// Rejects queries whose title has no comparable content.
    pub fn validate(&self) -> Result<(), MatchError> {
        if canonical::normalize(&self.title).is_empty() {
            return Err(MatchError::MissingTitle);
        }
        Ok(())
    }
}

/// Search-stage view of a catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateSummary {
    /// Unique within the catalog.
    pub catalog_id: String,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
}

impl CandidateSummary {
    pub fn new(catalog_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            title: title.into(),
            original_title: None,
            release_year: None,
        }
    }

    pub fn with_original_title(mut self, original_title: impl Into<String>) -> Self {
        self.original_title = Some(original_title.into());
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }

    /// "Title (Year)" when the year is known, the bare title otherwise.
    pub fn display_name(&self) -> String {
        match self.release_year {
            Some(year) => format!("{} ({year})", self.title),
            None => self.title.clone(),
        }
    }
}

/// Detail-stage fields, fetched per candidate only when a query needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateDetail {
    /// Ordered as the catalog credits them.
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// A candidate as the scorer sees it: the summary plus detail when resolved.
///
/// `detail` is `None` when the orchestrator did not need it or the lookup
/// failed. The scorer never fetches; fields without data are simply skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub summary: CandidateSummary,
    #[serde(default)]
    pub detail: Option<CandidateDetail>,
}

impl Candidate {
    pub fn from_summary(summary: CandidateSummary) -> Self {
        Self {
            summary,
            detail: None,
        }
    }

    pub fn detailed(summary: CandidateSummary, detail: CandidateDetail) -> Self {
        Self {
            summary,
            detail: Some(detail),
        }
    }

    pub fn catalog_id(&self) -> &str {
        &self.summary.catalog_id
    }

    pub(crate) fn directors(&self) -> &[String] {
        self.detail
            .as_ref()
            .map(|d| d.directors.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn countries(&self) -> &[String] {
        self.detail
            .as_ref()
            .map(|d| d.countries.as_slice())
            .unwrap_or_default()
    }
}

impl From<CandidateSummary> for Candidate {
    fn from(summary: CandidateSummary) -> Self {
        Candidate::from_summary(summary)
    }
}

/// Scorer output for one candidate of one query. Lives for a single request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Composite confidence in [0, 1].
    pub score: f64,
    pub matched: bool,
}

impl ScoredCandidate {
    /// Score on the 0–100 scale reconciliation clients expect, one decimal.
    pub fn protocol_score(&self) -> f64 {
        (self.score * 1000.0).round() / 10.0
    }
}

/// Candidates in descending score order with at most one `matched` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    pub candidates: Vec<ScoredCandidate>,
}

impl RankedResult {
    /// The "no reconciliation found" outcome.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// The auto-matched candidate, if any.
    pub fn auto_match(&self) -> Option<&ScoredCandidate> {
        self.candidates.iter().find(|c| c.matched)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredCandidate> {
        self.candidates.iter()
    }
}

impl IntoIterator for RankedResult {
    type Item = ScoredCandidate;
    type IntoIter = std::vec::IntoIter<ScoredCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Invalid scoring or ranking configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// The query carries no usable title.
    #[error("query title is empty after normalization")]
    MissingTitle,
}
