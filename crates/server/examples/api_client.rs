//! Walks through the reconciliation API the way OpenRefine drives it.
//!
//! Start the server first (`TMDB_API_KEY=... cargo run -p filmrecon-server`).

use reqwest::Client;
use serde_json::json;

const SERVER_URL: &str = "http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    // 1. Registration handshake: the service manifest
    println!("1. Service manifest:");
    let resp = client.get(format!("{SERVER_URL}/reconcile")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // 2. Property autocomplete in the reconcile dialog
    println!("2. Suggest properties for 'dir':");
    let resp = client
        .get(format!("{SERVER_URL}/suggest/properties"))
        .query(&[("prefix", "dir")])
        .send()
        .await?;
    println!("Body: {}", resp.text().await?);
    println!();

    // 3. A batch of queries, posted as a form the way OpenRefine sends them
    println!("3. Reconcile a batch:");
    let queries = json!({
        "q0": {
            "query": "Nosferatu",
            "properties": [
                {"pid": "year", "v": "1922"},
                {"pid": "director", "v": "F. W. Murnau"}
            ]
        },
        "q1": {
            "query": "Mirror",
            "limit": 3
        },
        "q2": {
            "query": "Mirror",
            "properties": [
                {"pid": "year", "v": 1975},
                {"pid": "country", "v": "USSR"}
            ]
        }
    });
    let resp = client
        .post(format!("{SERVER_URL}/reconcile"))
        .form(&[("queries", queries.to_string())])
        .send()
        .await?;
    println!("Status: {}", resp.status());
    let body: serde_json::Value = resp.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    println!();

    // 4. JSONP for clients that cannot make cross-origin requests
    println!("4. JSONP manifest:");
    let resp = client
        .get(format!("{SERVER_URL}/reconcile"))
        .query(&[("callback", "handleManifest")])
        .send()
        .await?;
    println!(
        "Content-Type: {:?}",
        resp.headers().get(reqwest::header::CONTENT_TYPE)
    );
    println!("Body: {}", resp.text().await?);

    Ok(())
}
