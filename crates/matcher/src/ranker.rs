use tracing::debug;

use crate::config::MatchConfig;
use crate::types::{RankedResult, ScoredCandidate};

// Float slack for the gap comparison: 1.0 - 0.9 is slightly below 0.1.
const GAP_EPSILON: f64 = 1e-9;

/// Rank scored candidates and truncate to `config.max_results`.
pub fn rank(config: &MatchConfig, scored: Vec<ScoredCandidate>) -> RankedResult {
    rank_top(config, scored, config.max_results)
}

/// Rank scored candidates and truncate to `limit`.
///
/// Sorting is stable, so equal scores keep catalog search order. At most one
/// candidate stays `matched`: the highest-scoring one that the scorer flagged,
/// and only if it leads every other candidate by `min_match_gap`. The gap is
/// measured before truncation.
pub fn rank_top(config: &MatchConfig, mut scored: Vec<ScoredCandidate>, limit: usize) -> RankedResult {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(winner) = scored.iter().position(|c| c.matched) {
        let winner_score = scored[winner].score;
        let runner_up = scored
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != winner)
            .map(|(_, c)| c.score)
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));

        let clears_gap = runner_up
            .map_or(true, |other| winner_score - other + GAP_EPSILON >= config.min_match_gap);

        for (idx, candidate) in scored.iter_mut().enumerate() {
            candidate.matched = idx == winner && clears_gap;
        }

        debug!(
            winner = %scored[winner].candidate.catalog_id(),
            winner_score,
            runner_up,
            clears_gap,
            "auto-match decision"
        );
    }

    scored.truncate(limit);
    RankedResult { candidates: scored }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CandidateSummary;

    fn scored(id: &str, score: f64, matched: bool) -> ScoredCandidate {
        ScoredCandidate {
            candidate: CandidateSummary::new(id, "Mirror").into(),
            score,
            matched,
        }
    }

    fn ids(result: &RankedResult) -> Vec<&str> {
        result.iter().map(|c| c.candidate.catalog_id()).collect()
    }

    #[test]
    fn sorts_descending_and_keeps_ties_stable() {
        let cfg = MatchConfig::default();
        let result = rank(
            &cfg,
            vec![scored("a", 0.4, false), scored("b", 0.9, false), scored("c", 0.4, false)],
        );
        assert_eq!(ids(&result), vec!["b", "a", "c"]);
    }

    #[test]
    fn only_highest_matched_survives() {
        let cfg = MatchConfig::default();
        let result = rank(
            &cfg,
            vec![scored("a", 0.86, true), scored("b", 1.0, true), scored("c", 0.2, false)],
        );
        let matched: Vec<_> = result.iter().filter(|c| c.matched).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].candidate.catalog_id(), "b");
        assert_eq!(result.candidates[1].score, 0.86);
    }

    #[test]
    fn close_runner_up_cancels_auto_match() {
        let cfg = MatchConfig::default();
        let result = rank(&cfg, vec![scored("a", 1.0, true), scored("b", 0.95, false)]);
        assert!(result.auto_match().is_none());
    }

    #[test]
    fn exact_gap_clears() {
        let cfg = MatchConfig::default();
        let result = rank(&cfg, vec![scored("a", 1.0, true), scored("b", 0.9, false)]);
        assert_eq!(result.auto_match().map(|c| c.candidate.catalog_id()), Some("a"));
    }

    #[test]
    fn sole_candidate_keeps_match() {
        let cfg = MatchConfig::default();
        let result = rank(&cfg, vec![scored("a", 0.9, true)]);
        assert!(result.auto_match().is_some());
    }

    #[test]
    fn truncates_to_limit() {
        let cfg = MatchConfig::default();
        let many = (0..8).map(|i| scored(&i.to_string(), i as f64 / 10.0, false)).collect();
        assert_eq!(rank(&cfg, many).len(), 5);

        let many = (0..8).map(|i| scored(&i.to_string(), i as f64 / 10.0, false)).collect();
        assert_eq!(rank_top(&cfg, many, 2).len(), 2);
    }

    #[test]
    fn empty_input_is_empty_result() {
        assert!(rank(&MatchConfig::default(), Vec::new()).is_empty());
    }
}
