//! Workspace umbrella crate for film reconciliation.
//!
//! Stitches the catalog client and the scoring engine into a single entry
//! point: give a [`Reconciler`] a [`Query`] and it searches the catalog,
//! resolves director and country detail when the query asks for them, and
//! returns ranked candidates with at most one auto-match.
//!
//! ```no_run
//! use std::sync::Arc;
//! use filmrecon::{CatalogRecord, CandidateSummary, Query, Reconciler, StaticCatalog};
//!
//! # async fn run() {
//! let catalog = StaticCatalog::new(vec![CatalogRecord::new(
//!     CandidateSummary::new("653", "Nosferatu").with_release_year(1922),
//! )
//! .with_directors(["F. W. Murnau"])]);
//!
//! let reconciler = Reconciler::with_client(Arc::new(catalog));
//! let result = reconciler
//!     .reconcile(&Query::new("Nosferatu").with_year(1922))
//!     .await;
//! assert_eq!(result.auto_match().map(|c| c.candidate.catalog_id()), Some("653"));
//! # }
//! ```

mod config;
mod error;
mod metrics;
mod reconciler;

pub use canonical::{collapse_whitespace, normalize, normalize_tokens};
pub use catalog::{
    CatalogClient, CatalogConfig, CatalogError, CatalogRecord, StaticCatalog, TmdbClient,
};
pub use matcher::{
    Candidate, CandidateDetail, CandidateSummary, FieldWeights, MatchConfig, MatchError, Matcher,
    Query, RankedResult, ScoredCandidate,
};

pub use crate::config::{ConfigLoadError, OrchestratorConfig, ReconcileConfig};
pub use crate::error::ReconcileError;
pub use crate::metrics::ReconcileMetrics;
pub use crate::reconciler::Reconciler;
