//! # Film Catalog (`catalog`)
//!
//! The outbound side of reconciliation: a [`CatalogClient`] searches the
//! authoritative film catalog and fetches per-record detail on demand.
//!
//! - [`TmdbClient`]: The Movie Database over HTTPS (`reqwest`), with a circuit
//!   breaker, token-bucket rate limiter and retry policy owned by the client.
//! - [`StaticCatalog`]: in-memory records for tests, demos and offline runs.
//!
//! Clients are passed explicitly to whoever needs them; there is no global
//! client or shared credential state.
//!
//! ```no_run
//! use catalog::{CatalogClient, CatalogConfig, TmdbClient};
//!
//! # async fn run() -> Result<(), catalog::CatalogError> {
//! let client = TmdbClient::new(CatalogConfig::default().with_api_key("..."))?;
//! let hits = client.search("Nosferatu", Some(1922)).await?;
//! if let Some(first) = hits.first() {
//!     let detail = client.fetch_detail(&first.catalog_id).await?;
//!     println!("{} directed by {:?}", first.display_name(), detail.directors);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod memory;
pub mod resilience;
mod serde_millis;
mod tmdb;

pub use crate::client::CatalogClient;
pub use crate::config::CatalogConfig;
pub use crate::error::CatalogError;
pub use crate::memory::{CatalogRecord, StaticCatalog};
pub use crate::resilience::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, RateLimitConfig, RetryConfig, TokenBucket,
};
pub use crate::tmdb::TmdbClient;
