use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use catalog::{CatalogClient, TmdbClient};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use matcher::{
    Candidate, CandidateDetail, CandidateSummary, MatchConfig, Matcher, Query, RankedResult,
};
use tracing::{debug, error, info, warn};

use crate::config::{OrchestratorConfig, ReconcileConfig};
use crate::error::ReconcileError;
use crate::metrics::{QuerySpan, ReconcileMetrics};

/// Query orchestrator: search the catalog, resolve detail where the query
/// needs it, then score and rank.
///
/// Cloning is cheap. The reconciler keeps no state between calls, so a single
/// instance serves every query and batch concurrently.
#[derive(Clone)]
pub struct Reconciler {
    client: Arc<dyn CatalogClient>,
    matcher: Matcher,
    config: OrchestratorConfig,
    metrics: Option<Arc<dyn ReconcileMetrics>>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("catalog", &self.client.name())
            .field("matcher", &self.matcher)
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Reconciler {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        match_config: MatchConfig,
        config: OrchestratorConfig,
    ) -> Result<Self, ReconcileError> {
        config.validate()?;
        Ok(Self {
            client,
            matcher: Matcher::new(match_config)?,
            config,
            metrics: None,
        })
    }

    /// Default scoring and orchestration settings over `client`.
    pub fn with_client(client: Arc<dyn CatalogClient>) -> Self {
        Self {
            client,
            matcher: Matcher::default(),
            config: OrchestratorConfig::default(),
            metrics: None,
        }
    }

    /// Build from a loaded pipeline config with an explicit catalog client.
    pub fn from_config(
        config: &ReconcileConfig,
        client: Arc<dyn CatalogClient>,
    ) -> Result<Self, ReconcileError> {
        Self::new(client, config.matcher.clone(), config.orchestrator.clone())
    }

    /// Build from a loaded pipeline config, talking to TMDB.
    pub fn tmdb(config: &ReconcileConfig) -> Result<Self, ReconcileError> {
        let client = TmdbClient::new(config.catalog.clone())?;
        Self::from_config(config, Arc::new(client))
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn ReconcileMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn catalog_name(&self) -> &'static str {
        self.client.name()
    }

    pub fn match_config(&self) -> &MatchConfig {
        self.matcher.config()
    }

    pub fn orchestrator_config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Reconcile one query with the configured top-N.
    pub async fn reconcile(&self, query: &Query) -> RankedResult {
        self.reconcile_top(query, None).await
    }

    /// Reconcile one query, optionally lowering the top-N.
    ///
    /// Never fails: a blank title, a catalog outage or an empty search all
    /// come back as an empty result. Detail lookups that fail leave their
    /// candidate scored on the fields it has.
    pub async fn reconcile_top(&self, query: &Query, limit: Option<usize>) -> RankedResult {
        let span = QuerySpan::start(self.metrics.as_ref());

        if let Err(err) = query.validate() {
            debug!(error = %err, "skipping malformed query");
            span.finish(0, false);
            return RankedResult::empty();
        }

        let Some(summaries) = self.search(query).await else {
            span.finish(0, false);
            return RankedResult::empty();
        };

        let candidates = self.resolve(query, summaries).await;
        let limit = limit.unwrap_or(self.matcher.config().max_results);
        let result = self.matcher.evaluate_top(query, &candidates, limit);

        let auto_match = result.auto_match().map(|c| c.candidate.catalog_id().to_string());
        let latency = span.finish(result.len(), auto_match.is_some());
        info!(
            title = %query.title,
            year = query.year,
            considered = candidates.len(),
            returned = result.len(),
            auto_match = auto_match.as_deref(),
            latency_ms = latency.as_millis() as u64,
            "query reconciled"
        );
        result
    }

    /// Reconcile a batch, keeping input order. Each item is independent; at
    /// most `batch_concurrency` are in flight.
    pub async fn reconcile_batch<K>(&self, items: Vec<(K, Query)>) -> Vec<(K, RankedResult)> {
        self.reconcile_batch_top(items.into_iter().map(|(key, query)| (key, query, None)).collect())
            .await
    }

    /// Like [`Reconciler::reconcile_batch`] with a per-item top-N.
    pub async fn reconcile_batch_top<K>(
        &self,
        items: Vec<(K, Query, Option<usize>)>,
    ) -> Vec<(K, RankedResult)> {
        let concurrency = self.config.batch_concurrency.max(1);
        stream::iter(items)
            .map(|(key, query, limit)| async move {
                let result = self.reconcile_top(&query, limit).await;
                (key, result)
            })
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Year hints in search order: the stated year, then outward by one year
    /// up to the spread, then a search without a year.
    fn year_hints(&self, year: Option<i32>) -> Vec<Option<i32>> {
        let mut hints = Vec::new();
        if let Some(year) = year {
            hints.push(Some(year));
            for offset in 1..=self.config.year_hint_spread as i32 {
                // Years at the edge of the range lose the hints that overflow.
                hints.extend(year.checked_sub(offset).map(Some));
                hints.extend(year.checked_add(offset).map(Some));
            }
        }
        hints.push(None);
        hints
    }

    /// Run every search, merge by catalog id in first-seen order and cap.
    /// `None` when every search failed.
    async fn search(&self, query: &Query) -> Option<Vec<CandidateSummary>> {
        let hints = self.year_hints(query.year);
        let title = query.title.trim();
        let responses = join_all(hints.iter().map(|hint| self.client.search(title, *hint))).await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let mut failures = 0;

        for (hint, response) in hints.iter().zip(responses) {
            match response {
                Ok(hits) => {
                    for hit in hits {
                        if seen.insert(hit.catalog_id.clone()) {
                            merged.push(hit);
                        }
                    }
                }
                Err(err) => {
                    failures += 1;
                    warn!(catalog = self.client.name(), year_hint = *hint, error = %err, "catalog search failed");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_search_failure(self.client.name());
                    }
                }
            }
        }

        if failures == hints.len() {
            error!(
                catalog = self.client.name(),
                title = %query.title,
                "every catalog search failed, returning no candidates"
            );
            return None;
        }

        merged.truncate(self.config.max_candidates);
        debug!(title = %query.title, candidates = merged.len(), "search merged");
        Some(merged)
    }

    /// Attach detail to the candidates worth a lookup when the query has a
    /// director or country. Failed lookups leave the summary alone.
    async fn resolve(&self, query: &Query, summaries: Vec<CandidateSummary>) -> Vec<Candidate> {
        if !query.needs_detail() || summaries.is_empty() {
            return summaries.into_iter().map(Candidate::from_summary).collect();
        }

        let mut eligible: Vec<(usize, f64)> = summaries
            .iter()
            .enumerate()
            .map(|(idx, summary)| (idx, self.matcher.title_similarity(query, summary)))
            .filter(|(_, similarity)| *similarity >= self.config.detail_min_title_similarity)
            .collect();
        eligible.sort_by(|a, b| b.1.total_cmp(&a.1));
        eligible.truncate(self.config.max_detail_fetches);

        let lookups = eligible.iter().map(|&(idx, _)| {
            let catalog_id = summaries[idx].catalog_id.clone();
            async move { (idx, self.client.fetch_detail(&catalog_id).await) }
        });

        let mut details: HashMap<usize, CandidateDetail> = HashMap::new();
        for (idx, outcome) in join_all(lookups).await {
            let succeeded = outcome.is_ok();
            match outcome {
                Ok(detail) => {
                    details.insert(idx, detail);
                }
                Err(err) => {
                    warn!(
                        catalog = self.client.name(),
                        catalog_id = %summaries[idx].catalog_id,
                        error = %err,
                        "detail lookup failed, scoring without it"
                    );
                }
            }
            if let Some(metrics) = &self.metrics {
                metrics.record_detail_fetch(self.client.name(), succeeded);
            }
        }

        summaries
            .into_iter()
            .enumerate()
            .map(|(idx, summary)| Candidate {
                summary,
                detail: details.remove(&idx),
            })
            .collect()
    }
}
