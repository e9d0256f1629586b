//! # Film Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` is the scoring core of the reconciliation service. Given a noisy
//! film [`Query`] and the [`Candidate`]s a catalog search returned, it decides
//! how well each candidate fits and whether one of them is confident enough to
//! be applied without human review.
//!
//! The crate performs no I/O. Candidate detail (directors, countries) is
//! resolved by the caller before scoring; a candidate without detail is scored
//! on the fields it has.
//!
//! ## Core Types
//!
//! - [`Query`]: title plus optional year, director and country.
//! - [`CandidateSummary`] / [`CandidateDetail`] / [`Candidate`]: the two-stage
//!   catalog record (search result, then optional detail lookup).
//! - [`ScoredCandidate`]: candidate, composite score in `[0, 1]`, `matched` flag.
//! - [`RankedResult`]: descending scores, at most one `matched` entry.
//! - [`MatchConfig`]: weights, thresholds and top-N.
//! - [`Matcher`]: validated config plus `evaluate` (score then rank).
//!
//! ## Pipeline
//!
//! 1. [`fields`]: title, year, director and country similarities.
//! 2. [`score`]: weighted composite over the fields the query supplied and the
//!    candidate can answer, plus the `matched` policy (threshold and year gate).
//! 3. [`rank`]: stable descending sort, auto-match exclusivity with a
//!    confidence gap over the runner-up, truncation.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Candidate, CandidateDetail, CandidateSummary, Matcher, Query};
//!
//! let candidate = Candidate::detailed(
//!     CandidateSummary::new("653", "Nosferatu, eine Symphonie des Grauens")
//!         .with_original_title("Nosferatu")
//!         .with_release_year(1922),
//!     CandidateDetail {
//!         directors: vec!["Friedrich Wilhelm Murnau".into()],
//!         countries: vec!["Germany".into()],
//!     },
//! );
//!
//! let query = Query::new("Nosferatu")
//!     .with_year(1922)
//!     .with_director("F.W. Murnau")
//!     .with_country("Germany");
//!
//! let result = Matcher::default().evaluate(&query, &[candidate]);
//! let best = result.auto_match().expect("auto-match");
//! assert_eq!(best.candidate.catalog_id(), "653");
//! ```

mod config;
mod engine;
pub mod fields;
mod ranker;
mod scorer;
mod types;

pub use crate::config::{FieldWeights, MatchConfig};
pub use crate::engine::Matcher;
pub use crate::ranker::{rank, rank_top};
pub use crate::scorer::score;
pub use crate::types::{
    Candidate, CandidateDetail, CandidateSummary, MatchError, Query, RankedResult,
    ScoredCandidate,
};
