//! Drives the router end to end over an in-memory catalog.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use filmrecon::{CandidateSummary, CatalogRecord, Reconciler, StaticCatalog};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

fn catalog() -> StaticCatalog {
    StaticCatalog::new(vec![
        CatalogRecord::new(CandidateSummary::new("653", "Nosferatu").with_release_year(1922))
            .with_directors(["F. W. Murnau"])
            .with_countries(["Germany"]),
        CatalogRecord::new(
            CandidateSummary::new("6404", "Nosferatu the Vampyre").with_release_year(1979),
        )
        .with_directors(["Werner Herzog"])
        .with_countries(["West Germany", "France"]),
        CatalogRecord::new(CandidateSummary::new("1396", "Mirror").with_release_year(1975))
            .with_directors(["Andrei Tarkovsky"])
            .with_countries(["Soviet Union"]),
        CatalogRecord::new(CandidateSummary::new("27205", "Mirror").with_release_year(1997))
            .with_directors(["Jafar Panahi"])
            .with_countries(["Iran"]),
    ])
}

fn app() -> Router {
    let config = ServerConfig {
        service_url: Some("http://recon.test".into()),
        ..Default::default()
    };
    let reconciler = Reconciler::with_client(Arc::new(catalog()));
    build_router(Arc::new(ServerState::with_reconciler(config, reconciler)))
}

/// Percent-encode for query strings and form bodies.
fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

async fn send(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_form(uri: &str, body: String) -> (StatusCode, axum::http::HeaderMap, String) {
    send(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn manifest_is_served_without_queries() {
    let (status, _, body) = get("/reconcile").await;
    assert_eq!(status, StatusCode::OK);

    let manifest = json_body(&body);
    assert_eq!(manifest["name"], "TMDB Movie Reconciliation");
    assert_eq!(manifest["identifierSpace"], "https://www.themoviedb.org/movie/");
    assert_eq!(manifest["view"]["url"], "https://www.themoviedb.org/movie/{{id}}");
    assert_eq!(
        manifest["suggest"]["property"]["service_url"],
        "http://recon.test"
    );
    assert_eq!(manifest["defaultTypes"][0]["id"], "movie");
}

#[tokio::test]
async fn posted_queries_are_reconciled() {
    let queries = json!({
        "q0": {
            "query": "Nosferatu",
            "properties": [
                {"pid": "year", "v": "1922"},
                {"pid": "director", "v": "F. W. Murnau"}
            ]
        },
        "q1": {"query": "Mirror"}
    });
    let (status, headers, body) =
        post_form("/reconcile", format!("queries={}", encode(&queries.to_string()))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let results = json_body(&body);
    let q0 = results["q0"]["result"].as_array().unwrap();
    assert_eq!(q0[0]["id"], "653");
    assert_eq!(q0[0]["name"], "Nosferatu (1922)");
    assert_eq!(q0[0]["score"], 100.0);
    assert_eq!(q0[0]["match"], true);
    assert_eq!(q0[0]["type"], json!([{"id": "movie", "name": "Movie"}]));
    assert!(q0[1..].iter().all(|c| c["match"] == false));

    let q1 = results["q1"]["result"].as_array().unwrap();
    assert_eq!(q1.len(), 2);
    assert!(q1.iter().all(|c| c["match"] == false));
}

#[tokio::test]
async fn queries_in_the_query_string_work_too() {
    let queries = r#"{"a":{"query":"Mirror","properties":[{"pid":"year","v":1997}]}}"#;
    let (status, _, body) = get(&format!("/reconcile?queries={}", encode(queries))).await;

    assert_eq!(status, StatusCode::OK);
    let results = json_body(&body);
    assert_eq!(results["a"]["result"][0]["id"], "27205");
    assert_eq!(results["a"]["result"][0]["match"], true);
}

#[tokio::test]
async fn limit_and_malformed_items() {
    let queries = json!({
        "limited": {"query": "Mirror", "limit": 1},
        "no_title": {"properties": [{"pid": "year", "v": 1975}]},
        "blank": {"query": "   "}
    });
    let (status, _, body) =
        post_form("/reconcile", format!("queries={}", encode(&queries.to_string()))).await;

    assert_eq!(status, StatusCode::OK);
    let results = json_body(&body);
    assert_eq!(results["limited"]["result"].as_array().unwrap().len(), 1);
    assert_eq!(results["no_title"], json!({"result": []}));
    assert_eq!(results["blank"], json!({"result": []}));
}

#[tokio::test]
async fn invalid_queries_json_is_a_bad_request() {
    let (status, _, body) = post_form("/reconcile", format!("queries={}", encode("{not json"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn callback_switches_to_jsonp() {
    let (status, headers, body) = get("/reconcile?callback=jsonp123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/javascript");
    assert!(body.starts_with("jsonp123({"));
    assert!(body.ends_with(')'));
    let inner = &body["jsonp123(".len()..body.len() - 1];
    assert_eq!(json_body(inner)["name"], "TMDB Movie Reconciliation");
}

#[tokio::test]
async fn unsafe_callback_is_rejected() {
    let (status, _, _) = get(&format!("/reconcile?callback={}", encode("alert(1)//"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suggest_properties_filters_by_name() {
    let (status, _, body) = get("/suggest/properties?prefix=DIR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({"result": [{"id": "director", "name": "Director"}]})
    );

    let (_, _, body) = get("/suggest/properties").await;
    assert_eq!(json_body(&body)["result"].as_array().unwrap().len(), 3);

    let (_, headers, body) = get("/suggest/properties?prefix=year&callback=cb").await;
    assert_eq!(headers[header::CONTENT_TYPE], "application/javascript");
    assert_eq!(body, r#"cb({"result":[{"id":"year","name":"Year"}]})"#);
}

#[tokio::test]
async fn health_and_readiness() {
    let (status, _, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "healthy");

    let (status, _, body) = get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    let ready = json_body(&body);
    assert_eq!(ready["components"]["catalog"], "static");
    assert_eq!(ready["components"]["matcher"]["max_results"], 5);
}

#[tokio::test]
async fn metrics_render_as_text() {
    let (status, headers, _) = get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn metrics_can_be_disabled() {
    let config = ServerConfig {
        metrics_enabled: false,
        ..Default::default()
    };
    let state = ServerState::with_reconciler(config, Reconciler::with_client(Arc::new(catalog())));
    let response = build_router(Arc::new(state))
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let (status, _, body) = get("/extend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn request_ids_are_assigned_and_echoed() {
    let (_, headers, _) = get("/health").await;
    assert!(!headers["x-request-id"].is_empty());

    let (_, headers, _) = send(
        Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(headers["x-request-id"], "abc-123");
}
