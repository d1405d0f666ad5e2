//! End-to-end harvest tests
//!
//! Drive the full pipeline (HTTP fetch, normalization, SQLite storage)
//! against a mock listing server, and check de-duplication across ticks.

use gleaner::config::{SearchConfig, SourceId};
use gleaner::fetch::{FetchError, FetcherOptions, HttpFetcher, SourceFetcher};
use gleaner::harvest::{FetchOrchestrator, Pacing};
use gleaner::normalize::ListingNormalizer;
use gleaner::storage::{ListingStore, SqliteStore};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_options(server: &MockServer) -> FetcherOptions {
    FetcherOptions {
        base_url: format!("{}/groups", server.uri()),
        ..Default::default()
    }
}

fn listing_page(texts: &[&str]) -> String {
    let items: String = texts
        .iter()
        .map(|text| format!("<article><p>{}</p><a href=\"/listing/{}\">details</a></article>", text, text.len()))
        .collect();
    format!("<html><body>{}</body></html>", items)
}

async fn mount_page(server: &MockServer, group: &str, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/groups/{}", group)))
        .and(query_param("page", page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_harvest_cycle_stores_and_deduplicates() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "berlin-flats",
        "1",
        listing_page(&["Sunny two-room flat", "Room in shared flat"]),
    )
    .await;
    mount_page(
        &server,
        "berlin-flats",
        "2",
        listing_page(&["Studio near the station"]),
    )
    .await;

    let tmp = tempfile::tempdir().expect("tempdir");
    let db_path = tmp.path().join("harvest.db");

    let store = Arc::new(SqliteStore::new(&db_path).expect("open store"));
    let fetcher = Arc::new(HttpFetcher::new(fetcher_options(&server)).expect("build fetcher"));
    let orchestrator = FetchOrchestrator::new(
        fetcher,
        Arc::new(ListingNormalizer::new()),
        Arc::clone(&store) as Arc<dyn ListingStore>,
        Pacing::none(),
    );

    let config = SearchConfig {
        groups: vec![SourceId::from("berlin-flats")],
        pages: 2,
        ..Default::default()
    };

    // First tick stores all three listings
    orchestrator.run_all(&config).await;
    assert_eq!(store.count_entries().unwrap(), 3);
    assert_eq!(
        store
            .count_entries_for_source(&SourceId::from("berlin-flats"))
            .unwrap(),
        3
    );

    // Second tick sees the same pages and inserts nothing new
    orchestrator.run_all(&config).await;
    assert_eq!(store.count_entries().unwrap(), 3);
}

#[tokio::test]
async fn harvest_continues_past_failing_source() {
    let server = MockServer::start().await;

    mount_page(&server, "good", "1", listing_page(&["Only listing"])).await;

    Mock::given(method("GET"))
        .and(path("/groups/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().expect("tempdir");
    let db_path = tmp.path().join("harvest.db");

    let store = Arc::new(SqliteStore::new(&db_path).expect("open store"));
    let fetcher = Arc::new(HttpFetcher::new(fetcher_options(&server)).expect("build fetcher"));
    let orchestrator = FetchOrchestrator::new(
        fetcher,
        Arc::new(ListingNormalizer::new()),
        Arc::clone(&store) as Arc<dyn ListingStore>,
        Pacing::none(),
    );

    let config = SearchConfig {
        groups: vec![SourceId::from("broken"), SourceId::from("good")],
        pages: 1,
        ..Default::default()
    };

    orchestrator.run_all(&config).await;

    assert_eq!(store.count_entries().unwrap(), 1);
    assert_eq!(
        store.count_entries_for_source(&SourceId::from("good")).unwrap(),
        1
    );
}

#[tokio::test]
async fn fetcher_requests_pages_in_order() {
    let server = MockServer::start().await;

    // Each page must be requested exactly once
    for page in ["1", "2", "3"] {
        Mock::given(method("GET"))
            .and(path("/groups/g1"))
            .and(query_param("page", page))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing_page(&["listing"])),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let fetcher = HttpFetcher::new(fetcher_options(&server)).expect("build fetcher");
    let listings = fetcher.fetch(&SourceId::from("g1"), 3).await.expect("fetch");

    // Three pages with one (identical) listing each; de-duplication is the
    // store's job, not the fetcher's
    assert_eq!(listings.len(), 3);
}

#[tokio::test]
async fn fetcher_maps_http_status_to_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/groups/throttled"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(fetcher_options(&server)).expect("build fetcher");

    let missing = fetcher.fetch(&SourceId::from("missing"), 1).await;
    assert!(matches!(
        missing,
        Err(FetchError::Http { status: 404, .. })
    ));

    let throttled = fetcher.fetch(&SourceId::from("throttled"), 1).await;
    assert!(matches!(throttled, Err(FetchError::RateLimited { .. })));
}

#[tokio::test]
async fn zero_pages_fetches_nothing() {
    let server = MockServer::start().await;

    let fetcher = HttpFetcher::new(fetcher_options(&server)).expect("build fetcher");
    let listings = fetcher.fetch(&SourceId::from("g1"), 0).await.expect("fetch");

    assert!(listings.is_empty());
    // No request was made; wiremock would have returned 404 for any
}

#[tokio::test]
async fn empty_listing_page_yields_no_entries() {
    let server = MockServer::start().await;
    mount_page(&server, "quiet", "1", "<html><body></body></html>".to_string()).await;

    let tmp = tempfile::tempdir().expect("tempdir");
    let db_path = tmp.path().join("harvest.db");
    let store = Arc::new(SqliteStore::new(&db_path).expect("open store"));

    let fetcher = Arc::new(HttpFetcher::new(fetcher_options(&server)).expect("build fetcher"));
    let orchestrator = FetchOrchestrator::new(
        fetcher,
        Arc::new(ListingNormalizer::new()),
        Arc::clone(&store) as Arc<dyn ListingStore>,
        Pacing::none(),
    );

    let config = SearchConfig {
        groups: vec![SourceId::from("quiet")],
        pages: 1,
        ..Default::default()
    };
    orchestrator.run_all(&config).await;

    assert_eq!(store.count_entries().unwrap(), 0);
}
