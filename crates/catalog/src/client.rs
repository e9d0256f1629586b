use std::sync::Arc;

use async_trait::async_trait;
use matcher::{CandidateDetail, CandidateSummary};

use crate::error::CatalogError;

/// Capability to search an authoritative film catalog.
///
/// Implementations own their transport concerns (timeouts, retries, rate
/// limits). Callers treat every call as slow and fallible.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search by title, optionally narrowed to a release year. Results come
    /// back in the catalog's relevance order.
    async fn search(
        &self,
        title: &str,
        year_hint: Option<i32>,
    ) -> Result<Vec<CandidateSummary>, CatalogError>;

    /// Directors and production countries for one record.
    async fn fetch_detail(&self, catalog_id: &str) -> Result<CandidateDetail, CatalogError>;

    /// Short name used in logs and metrics labels.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    async fn search(
        &self,
        title: &str,
        year_hint: Option<i32>,
    ) -> Result<Vec<CandidateSummary>, CatalogError> {
        (**self).search(title, year_hint).await
    }

    async fn fetch_detail(&self, catalog_id: &str) -> Result<CandidateDetail, CatalogError> {
        (**self).fetch_detail(catalog_id).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
