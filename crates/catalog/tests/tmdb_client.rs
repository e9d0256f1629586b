//! Drives `TmdbClient` against a local stand-in for the TMDB API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use catalog::{
    CatalogClient, CatalogConfig, CatalogError, CircuitBreakerConfig, CircuitState, RetryConfig,
    TmdbClient,
};
use serde_json::json;

#[derive(Default)]
struct Fake {
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    /// Number of initial detail calls answered with 503.
    flaky_details: usize,
}

async fn search(
    State(fake): State<Arc<Fake>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    fake.search_calls.fetch_add(1, Ordering::SeqCst);
    if params.get("api_key").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status_code": 7, "status_message": "Invalid API key"})),
        );
    }
    let year = params.get("primary_release_year").cloned();
    let mut results = vec![
        json!({"id": 653, "title": "Nosferatu", "original_title": "Nosferatu, eine Symphonie des Grauens", "release_date": "1922-02-16"}),
        json!({"id": 6404, "title": "Nosferatu the Vampyre", "original_title": "Nosferatu: Phantom der Nacht", "release_date": "1979-01-17"}),
    ];
    if let Some(year) = year {
        results.retain(|r| r["release_date"].as_str().is_some_and(|d| d.starts_with(&year)));
    }
    (StatusCode::OK, Json(json!({"page": 1, "results": results})))
}

async fn detail(
    State(fake): State<Arc<Fake>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let call = fake.detail_calls.fetch_add(1, Ordering::SeqCst);
    if call < fake.flaky_details {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"status_message": "busy"})));
    }
    if params.get("append_to_response").map(String::as_str) != Some("credits") {
        return (StatusCode::BAD_REQUEST, Json(json!({"status_message": "credits missing"})));
    }
    if id != "653" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status_code": 34, "status_message": "The resource you requested could not be found."})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": 653,
            "production_countries": [{"iso_3166_1": "DE", "name": "Germany"}],
            "credits": {"crew": [{"name": "F. W. Murnau", "job": "Director"}]}
        })),
    )
}

async fn spawn_fake(fake: Arc<Fake>) -> SocketAddr {
    let app = Router::new()
        .route("/3/search/movie", get(search))
        .route("/3/movie/{id}", get(detail))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

fn config(addr: SocketAddr) -> CatalogConfig {
    let mut cfg = CatalogConfig::default()
        .with_api_key("test-key")
        .with_base_url(format!("http://{addr}/3"));
    cfg.retry = RetryConfig::default()
        .with_base_delay(Duration::from_millis(1))
        .with_jitter(false);
    cfg
}

#[tokio::test]
async fn search_returns_summaries_in_order() {
    let addr = spawn_fake(Arc::new(Fake::default())).await;
    let client = TmdbClient::new(config(addr)).expect("client");

    let hits = client.search("Nosferatu", None).await.expect("search");
    let ids: Vec<_> = hits.iter().map(|h| h.catalog_id.as_str()).collect();
    assert_eq!(ids, vec!["653", "6404"]);
    assert_eq!(hits[0].release_year, Some(1922));
}

#[tokio::test]
async fn year_hint_is_forwarded() {
    let addr = spawn_fake(Arc::new(Fake::default())).await;
    let client = TmdbClient::new(config(addr)).expect("client");

    let hits = client.search("Nosferatu", Some(1979)).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].catalog_id, "6404");
}

#[tokio::test]
async fn bad_credentials_fail_without_retry() {
    let fake = Arc::new(Fake::default());
    let addr = spawn_fake(fake.clone()).await;
    let mut cfg = config(addr);
    cfg.api_key = Some("wrong".into());
    let client = TmdbClient::new(cfg).expect("client");

    let err = client.search("Nosferatu", None).await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::Http {
            status: 401,
            message: "Invalid API key".into()
        }
    );
    assert_eq!(fake.search_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.breaker().current_state(), CircuitState::Closed);
}

#[tokio::test]
async fn detail_extracts_directors_and_countries() {
    let addr = spawn_fake(Arc::new(Fake::default())).await;
    let client = TmdbClient::new(config(addr)).expect("client");

    let detail = client.fetch_detail("653").await.expect("detail");
    assert_eq!(detail.directors, vec!["F. W. Murnau".to_string()]);
    assert_eq!(detail.countries, vec!["Germany".to_string()]);
}

#[tokio::test]
async fn unknown_record_is_not_found() {
    let addr = spawn_fake(Arc::new(Fake::default())).await;
    let client = TmdbClient::new(config(addr)).expect("client");

    let err = client.fetch_detail("1").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    let err = client.fetch_detail("../etc").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn transient_errors_are_retried() {
    let fake = Arc::new(Fake {
        flaky_details: 2,
        ..Default::default()
    });
    let addr = spawn_fake(fake.clone()).await;
    let client = TmdbClient::new(config(addr)).expect("client");

    let detail = client.fetch_detail("653").await.expect("detail after retries");
    assert_eq!(detail.countries, vec!["Germany".to_string()]);
    assert_eq!(fake.detail_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn breaker_opens_after_repeated_outages() {
    let fake = Arc::new(Fake {
        flaky_details: usize::MAX,
        ..Default::default()
    });
    let addr = spawn_fake(fake.clone()).await;
    let mut cfg = config(addr);
    cfg.retry = RetryConfig::disabled();
    cfg.circuit_breaker = CircuitBreakerConfig::default()
        .with_failure_threshold(2)
        .with_reset_timeout(Duration::from_secs(60));
    let client = TmdbClient::new(cfg).expect("client");

    for _ in 0..2 {
        let err = client.fetch_detail("653").await.unwrap_err();
        assert!(err.is_retryable());
    }
    let err = client.fetch_detail("653").await.unwrap_err();
    assert_eq!(err, CatalogError::CircuitOpen("tmdb".into()));
    assert_eq!(fake.detail_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_catalog_is_a_transport_error() {
    // Nothing listens on the discard port.
    let mut cfg = CatalogConfig::default()
        .with_api_key("k")
        .with_base_url("http://127.0.0.1:9/3");
    cfg.retry = RetryConfig::disabled();
    cfg.request_timeout = Duration::from_millis(500);
    let client = TmdbClient::new(cfg).expect("client");

    let err = client.search("Nosferatu", None).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)), "{err:?}");
}
