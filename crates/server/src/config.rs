use filmrecon::ReconcileConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Base URL advertised in the service manifest. Falls back to
    /// `SERVICE_BASE_URL`, then to the loopback address on `port`.
    #[serde(default)]
    pub service_url: Option<String>,

    /// YAML pipeline config (matcher, catalog, orchestrator sections)
    #[serde(default)]
    pub pipeline_config: Option<PathBuf>,

    /// TMDB v3 API key. Falls back to `TMDB_API_KEY`.
    #[serde(default, skip_serializing)]
    pub tmdb_api_key: Option<String>,

    /// TMDB v4 read access token, sent as a bearer token.
    #[serde(default, skip_serializing)]
    pub tmdb_bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            service_url: None,
            pipeline_config: None,
            tmdb_api_key: None,
            tmdb_bearer_token: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.{toml,yaml,json}`
    /// file and `FILMRECON_SERVER__*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "ignoring unreadable .env file");
            }
        }

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("FILMRECON_SERVER").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.tmdb_api_key.is_none() {
            config.tmdb_api_key = non_empty_env("TMDB_API_KEY");
        }
        if config.service_url.is_none() {
            config.service_url = non_empty_env("SERVICE_BASE_URL");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Base URL OpenRefine uses to call back into this service.
    pub fn public_base_url(&self) -> String {
        match self.service_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://127.0.0.1:{}", self.port),
        }
    }

    /// Pipeline config from `pipeline_config` (or defaults) with the TMDB
    /// credentials of this config applied.
    pub fn reconcile_config(&self) -> Result<ReconcileConfig, filmrecon::ConfigLoadError> {
        let mut reconcile = match &self.pipeline_config {
            Some(path) => ReconcileConfig::from_file(path)?,
            None => ReconcileConfig::default(),
        };
        if let Some(key) = &self.tmdb_api_key {
            reconcile.catalog.api_key = Some(key.clone());
        }
        if let Some(token) = &self.tmdb_bearer_token {
            reconcile.catalog.bearer_token = Some(token.clone());
        }
        Ok(reconcile)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_body_size_mb() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
