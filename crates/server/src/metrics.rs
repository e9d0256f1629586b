//! Prometheus metrics recording.

use std::time::Duration;

use filmrecon::ReconcileMetrics;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus recorder. When one is already
/// installed (several servers in one test binary) a detached recorder's
/// handle is returned instead.
pub fn install_recorder() -> PrometheusHandle {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(err) => {
            tracing::warn!(error = %err, "prometheus recorder already installed, using a detached one");
            PrometheusBuilder::new().build_recorder().handle()
        }
    }
}

/// Records HTTP request metrics.
pub fn record_request(method: &str, route: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Reconciler observer backed by the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl ReconcileMetrics for PrometheusMetrics {
    fn record_query(&self, latency: Duration, candidates: usize, auto_matched: bool) {
        counter!(
            "filmrecon_queries_total",
            "auto_matched" => auto_matched.to_string()
        )
        .increment(1);
        histogram!("filmrecon_query_duration_seconds").record(latency.as_secs_f64());
        histogram!("filmrecon_query_candidates").record(candidates as f64);
    }

    fn record_search_failure(&self, catalog: &'static str) {
        counter!("filmrecon_catalog_search_failures_total", "catalog" => catalog).increment(1);
    }

    fn record_detail_fetch(&self, catalog: &'static str, succeeded: bool) {
        let outcome = if succeeded { "ok" } else { "error" };
        counter!(
            "filmrecon_catalog_detail_fetches_total",
            "catalog" => catalog,
            "outcome" => outcome
        )
        .increment(1);
    }
}
