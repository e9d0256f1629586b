use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::metrics::{install_recorder, PrometheusMetrics};
use crate::protocol::ServiceManifest;
use filmrecon::Reconciler;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Query orchestrator (shared across requests)
    pub reconciler: Reconciler,

    /// Service manifest, fixed for the process lifetime
    pub manifest: Arc<ServiceManifest>,

    /// Prometheus rendering handle, when metrics are enabled
    pub prometheus: Option<PrometheusHandle>,
}

impl ServerState {
    /// Build state against TMDB using the configured credentials and
    /// pipeline config.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let reconcile_config = config.reconcile_config()?;
        let reconciler = Reconciler::tmdb(&reconcile_config)?;
        tracing::info!(
            catalog = reconciler.catalog_name(),
            config_name = reconcile_config.name.as_deref().unwrap_or("default"),
            "reconciler ready"
        );
        Ok(Self::with_reconciler(config, reconciler))
    }

    /// Build state around an existing reconciler. Metrics are attached when
    /// the config enables them.
    pub fn with_reconciler(config: ServerConfig, reconciler: Reconciler) -> Self {
        let (reconciler, prometheus) = if config.metrics_enabled {
            (
                reconciler.with_metrics(Arc::new(PrometheusMetrics)),
                Some(install_recorder()),
            )
        } else {
            (reconciler, None)
        };

        Self {
            manifest: Arc::new(ServiceManifest::new(&config.public_base_url())),
            config: Arc::new(config),
            reconciler,
            prometheus,
        }
    }
}
