use std::sync::Arc;

use filmrecon::{CandidateSummary, CatalogRecord, Query, Reconciler, StaticCatalog};

fn catalog() -> StaticCatalog {
    StaticCatalog::new(vec![
        CatalogRecord::new(
            CandidateSummary::new("19", "Metropolis").with_release_year(1927),
        )
        .with_directors(["Fritz Lang"])
        .with_countries(["Germany"]),
        CatalogRecord::new(
            CandidateSummary::new("9606", "Metropolis").with_release_year(2001),
        )
        .with_directors(["Rintaro"])
        .with_countries(["Japan"]),
        CatalogRecord::new(
            CandidateSummary::new("1878", "Fear and Loathing in Las Vegas")
                .with_release_year(1998),
        )
        .with_directors(["Terry Gilliam"])
        .with_countries(["United States of America"]),
    ])
}

fn queries() -> Vec<Query> {
    vec![
        Query::new("Metropolis"),
        Query::new("metropolis").with_year(1927),
        Query::new("METROPOLIS").with_director("Rintaro"),
        Query::new("Fear & Loathing in Las Vegas").with_country("USA"),
    ]
}

#[tokio::test]
async fn repeated_queries_produce_identical_results() {
    let reconciler = Reconciler::with_client(Arc::new(catalog()));

    for query in queries() {
        let first = reconciler.reconcile(&query).await;
        for _ in 0..5 {
            assert_eq!(reconciler.reconcile(&query).await, first, "{query:?}");
        }
    }
}

#[tokio::test]
async fn batch_matches_individual_queries() {
    let reconciler = Reconciler::with_client(Arc::new(catalog()));

    let mut individual = Vec::new();
    for query in queries() {
        individual.push(reconciler.reconcile(&query).await);
    }

    let batch = reconciler
        .reconcile_batch(queries().into_iter().enumerate().collect())
        .await;
    let batched: Vec<_> = batch.into_iter().map(|(_, result)| result).collect();
    assert_eq!(batched, individual);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_agree() {
    let reconciler = Reconciler::with_client(Arc::new(catalog()));
    let query = Query::new("Metropolis").with_year(1927);
    let expected = reconciler.reconcile(&query).await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let reconciler = reconciler.clone();
            let query = query.clone();
            tokio::spawn(async move { reconciler.reconcile(&query).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.expect("task"), expected);
    }
    assert_eq!(
        expected.auto_match().map(|c| c.candidate.catalog_id()),
        Some("19")
    );
}

#[tokio::test]
async fn case_and_punctuation_do_not_change_the_outcome() {
    let reconciler = Reconciler::with_client(Arc::new(catalog()));

    let plain = reconciler
        .reconcile(&Query::new("Metropolis").with_year(1927))
        .await;
    let noisy = reconciler
        .reconcile(&Query::new("  METROPOLIS!! ").with_year(1927))
        .await;
    assert_eq!(plain, noisy);
}
