//! The Movie Database (TMDB) v3 client.
//!
//! Endpoints used:
//! - `GET {base}/search/movie?query=&primary_release_year=`
//! - `GET {base}/movie/{id}?append_to_response=credits`

use std::time::Duration;

use async_trait::async_trait;
use matcher::{CandidateDetail, CandidateSummary};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::CatalogClient;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::resilience::{execute_with_retry, CircuitBreaker, TokenBucket};

const NAME: &str = "tmdb";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct MovieSummary {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetail {
    #[serde(default)]
    production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    credits: Credits,
}

#[derive(Debug, Deserialize)]
struct ProductionCountry {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    #[serde(default)]
    name: String,
    #[serde(default)]
    job: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status_message: Option<String>,
}

impl From<MovieSummary> for CandidateSummary {
    fn from(movie: MovieSummary) -> Self {
        CandidateSummary {
            catalog_id: movie.id.to_string(),
            title: movie.title,
            original_title: movie.original_title.filter(|t| !t.trim().is_empty()),
            release_year: movie.release_date.as_deref().and_then(parse_release_year),
        }
    }
}

impl From<MovieDetail> for CandidateDetail {
    fn from(detail: MovieDetail) -> Self {
        let directors = detail
            .credits
            .crew
            .into_iter()
            .filter(|member| member.job == "Director" && !member.name.trim().is_empty())
            .map(|member| member.name)
            .fold(Vec::new(), |mut acc: Vec<String>, name| {
                if !acc.contains(&name) {
                    acc.push(name);
                }
                acc
            });
        let countries = detail
            .production_countries
            .into_iter()
            .map(|country| country.name)
            .filter(|name| !name.trim().is_empty())
            .collect();
        CandidateDetail {
            directors,
            countries,
        }
    }
}

/// Year from a `YYYY-MM-DD` release date. Empty or malformed dates have no year.
pub(crate) fn parse_release_year(date: &str) -> Option<i32> {
    let prefix = date.trim().get(..4)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

/// HTTP client for TMDB with its own breaker, token bucket and retry policy.
#[derive(Debug)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: CatalogConfig,
    breaker: CircuitBreaker,
    limiter: TokenBucket,
}

impl TmdbClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout.min(Duration::from_secs(5)))
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| CatalogError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            breaker: CircuitBreaker::new(config.circuit_breaker),
            limiter: TokenBucket::new(config.rate_limit),
            http,
            config,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let mut request = self.http.get(self.url(path));
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            request = request.query(&[("api_key", key)]);
        }
        if let Some(token) = self
            .config
            .bearer_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            request = request.bearer_auth(token);
        }
        if let Some(language) = self.config.language.as_deref() {
            request = request.query(&[("language", language)]);
        }
        request
    }

    /// Send a request built by `build`, applying rate limiting, the circuit
    /// breaker and retries when resilience is enabled.
    async fn get_json<T, F>(&self, what: &str, build: F) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        if !self.config.enable_resilience {
            return send(build()).await;
        }

        if !self.limiter.acquire().await {
            warn!(catalog = NAME, what, "rate limit wait exceeded");
            return Err(CatalogError::RateLimited(NAME.into()));
        }
        if !self.breaker.allow_request() {
            warn!(catalog = NAME, what, "circuit open, skipping request");
            return Err(CatalogError::CircuitOpen(NAME.into()));
        }

        let outcome = execute_with_retry(&self.config.retry, CatalogError::is_retryable, |attempt| {
            if attempt > 0 {
                debug!(catalog = NAME, what, attempt, "retrying request");
            }
            send(build())
        })
        .await;

        match &outcome.result {
            Err(err) if err.is_retryable() => {
                self.breaker.record_failure();
                warn!(
                    catalog = NAME,
                    what,
                    attempts = outcome.attempts,
                    error = %err,
                    "request failed"
                );
            }
            _ => self.breaker.record_success(),
        }
        outcome.into_result()
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, CatalogError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(CatalogError::from);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(message));
    }
    Err(CatalogError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn search(
        &self,
        title: &str,
        year_hint: Option<i32>,
    ) -> Result<Vec<CandidateSummary>, CatalogError> {
        let include_adult = if self.config.include_adult { "true" } else { "false" };
        let response: SearchResponse = self
            .get_json("search", || {
                let mut request = self
                    .request("search/movie")
                    .query(&[("query", title), ("include_adult", include_adult)]);
                if let Some(year) = year_hint {
                    request = request.query(&[("primary_release_year", year)]);
                }
                request
            })
            .await?;

        debug!(
            catalog = NAME,
            title,
            year_hint,
            hits = response.results.len(),
            "search complete"
        );
        Ok(response.results.into_iter().map(CandidateSummary::from).collect())
    }

    async fn fetch_detail(&self, catalog_id: &str) -> Result<CandidateDetail, CatalogError> {
        if catalog_id.is_empty() || !catalog_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CatalogError::NotFound(catalog_id.to_string()));
        }
        let detail: MovieDetail = self
            .get_json("detail", || {
                self.request(&format!("movie/{catalog_id}"))
                    .query(&[("append_to_response", "credits")])
            })
            .await?;
        Ok(detail.into())
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
