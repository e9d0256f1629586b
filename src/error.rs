use catalog::CatalogError;
use matcher::MatchError;
use thiserror::Error;

/// Errors raised while assembling a [`crate::Reconciler`].
///
/// Reconciling itself never fails; these only come out of construction.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid orchestrator config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
