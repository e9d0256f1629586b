use async_trait::async_trait;
use matcher::{CandidateDetail, CandidateSummary};
use serde::{Deserialize, Serialize};

use crate::client::CatalogClient;
use crate::error::CatalogError;

/// One film held by a [`StaticCatalog`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    #[serde(flatten)]
    pub summary: CandidateSummary,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

impl CatalogRecord {
    pub fn new(summary: CandidateSummary) -> Self {
        Self {
            summary,
            directors: Vec::new(),
            countries: Vec::new(),
        }
    }

    pub fn with_directors<I, S>(mut self, directors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directors = directors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }
}

/// In-memory catalog for tests, demos and offline runs.
///
/// Search returns every record sharing at least one normalized token with the
/// query title (primary or original), in insertion order. A year hint keeps
/// only records released that year, like the remote catalog's
/// `primary_release_year` filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    records: Vec<CatalogRecord>,
}

impl StaticCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Load records from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<CatalogRecord> =
            serde_json::from_str(json).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(Self::new(records))
    }

    pub fn insert(&mut self, record: CatalogRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matches_title(record: &CatalogRecord, query_tokens: &[String]) -> bool {
        std::iter::once(record.summary.title.as_str())
            .chain(record.summary.original_title.as_deref())
            .any(|title| {
                canonical::normalize_tokens(title)
                    .iter()
                    .any(|token| query_tokens.contains(token))
            })
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn search(
        &self,
        title: &str,
        year_hint: Option<i32>,
    ) -> Result<Vec<CandidateSummary>, CatalogError> {
        let query_tokens = canonical::normalize_tokens(title);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .records
            .iter()
            .filter(|record| match year_hint {
                Some(year) => record.summary.release_year == Some(year),
                None => true,
            })
            .filter(|record| Self::matches_title(record, &query_tokens))
            .map(|record| record.summary.clone())
            .collect())
    }

    async fn fetch_detail(&self, catalog_id: &str) -> Result<CandidateDetail, CatalogError> {
        self.records
            .iter()
            .find(|record| record.summary.catalog_id == catalog_id)
            .map(|record| CandidateDetail {
                directors: record.directors.clone(),
                countries: record.countries.clone(),
            })
            .ok_or_else(|| CatalogError::NotFound(catalog_id.to_string()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
