use std::sync::Arc;
use std::time::{Duration, Instant};

/// Observer for reconciliation outcomes.
///
/// Injected into a [`crate::Reconciler`]; the library never installs a global
/// recorder. Implementations must be cheap, since they run on every query.
pub trait ReconcileMetrics: Send + Sync {
    /// One query finished, with the number of candidates returned.
    fn record_query(&self, latency: Duration, candidates: usize, auto_matched: bool);
    /// A catalog search call failed.
    fn record_search_failure(&self, catalog: &'static str);
    /// A per-candidate detail lookup finished.
    fn record_detail_fetch(&self, catalog: &'static str, succeeded: bool);
}

/// Times one query and reports it on [`QuerySpan::finish`].
pub(crate) struct QuerySpan {
    recorder: Option<Arc<dyn ReconcileMetrics>>,
    start: Instant,
}

impl QuerySpan {
    pub(crate) fn start(recorder: Option<&Arc<dyn ReconcileMetrics>>) -> Self {
        Self {
            recorder: recorder.cloned(),
            start: Instant::now(),
        }
    }

    pub(crate) fn finish(self, candidates: usize, auto_matched: bool) -> Duration {
        let latency = self.start.elapsed();
        if let Some(recorder) = self.recorder {
            recorder.record_query(latency, candidates, auto_matched);
        }
        latency
    }
}
