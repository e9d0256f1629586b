use tracing::debug;

use crate::config::MatchConfig;
use crate::fields::title_similarity;
use crate::ranker::rank_top;
use crate::scorer::score;
use crate::types::{Candidate, CandidateSummary, MatchError, Query, RankedResult};

#[cfg(test)]
mod tests;

/// Scores and ranks resolved candidates for a query.
///
/// `Matcher` holds only its validated configuration. It is `Send + Sync`,
/// performs no I/O and keeps no state between calls, so one instance can be
/// shared across every query of a batch.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Construct a matcher after validating `config`.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score every candidate and rank them with the configured top-N.
    ///
    /// A query without a usable title yields an empty result.
    pub fn evaluate(&self, query: &Query, candidates: &[Candidate]) -> RankedResult {
        self.evaluate_top(query, candidates, self.config.max_results)
    }

    /// Like [`Matcher::evaluate`] with a caller-supplied limit, capped at the
    /// configured `max_results`.
    pub fn evaluate_top(&self, query: &Query, candidates: &[Candidate], limit: usize) -> RankedResult {
        if let Err(err) = query.validate() {
            debug!(error = %err, title = %query.title, "query rejected before scoring");
            return RankedResult::empty();
        }

        let scored = candidates
            .iter()
            .map(|candidate| score(&self.config, query, candidate))
            .collect();

        rank_top(&self.config, scored, limit.min(self.config.max_results))
    }

    /// Title similarity alone, used to decide which candidates deserve a
    /// detail lookup before full scoring.
    pub fn title_similarity(&self, query: &Query, candidate: &CandidateSummary) -> f64 {
        title_similarity(&self.config, &query.title, candidate)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }
}
