//! Film reconciliation server
//!
//! Exposes the [`filmrecon::Reconciler`] over the OpenRefine reconciliation
//! protocol, backed by TMDB.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! Credentials come from `TMDB_API_KEY` (a `.env` file is read first) or
//! `FILMRECON_SERVER__TMDB_API_KEY`.
//!
//! # API Endpoints
//!
//! - `GET|POST /reconcile` - Service manifest, or reconciliation of `queries`
//! - `GET /suggest/properties` - Property autocomplete for the reconcile dialog
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//!
//! Every endpoint accepting `callback` answers JSONP when it is set.

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
