//! End-to-end pipeline tests against an embedded mock listing/content server
//!
//! The mock serves:
//! - `/r/{feed}/hot.json` and `/hot.json` (front page) listings
//! - `/img/{name}` content (`content of {name}`)
//! - `/slow/{name}` content after a delay, tracking concurrent requests
//! - `/missing/{name}` always HTTP 500

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use bytes::Bytes;
use mavic::config::Config;
use mavic::feed::{FeedCursor, FeedError, Listing, ListingSource};
use mavic::{RunReport, ScrapeOptions, Scraper};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tokio::time::{Duration, sleep};

#[derive(Clone)]
struct MockState {
    listings: Arc<HashMap<String, Value>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

struct MockServer {
    base: String,
    peak: Arc<AtomicUsize>,
}

/// Start the mock server; `listings` receives the server's base URL
async fn start_mock_server(
    listings: impl FnOnce(&str) -> HashMap<String, Value>,
) -> MockServer {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let state = MockState {
        listings: Arc::new(listings(&base)),
        in_flight: Arc::new(AtomicUsize::new(0)),
        peak: Arc::new(AtomicUsize::new(0)),
    };
    let peak = Arc::clone(&state.peak);

    let app = Router::new()
        .route("/r/{feed}/hot.json", get(serve_listing))
        .route("/hot.json", get(serve_front_page))
        .route("/img/{name}", get(serve_image))
        .route("/slow/{name}", get(serve_slow))
        .route("/missing/{name}", get(serve_missing))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer { base, peak }
}

async fn serve_listing(State(state): State<MockState>, Path(feed): Path<String>) -> Response {
    match state.listings.get(&feed) {
        Some(listing) => Json(listing.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found", "error": 404})))
            .into_response(),
    }
}

async fn serve_front_page(State(state): State<MockState>) -> Response {
    serve_listing(State(state), Path("frontpage".to_string())).await
}

async fn serve_image(Path(name): Path<String>) -> Bytes {
    Bytes::from(format!("content of {}", name))
}

async fn serve_slow(State(state): State<MockState>, Path(name): Path<String>) -> Bytes {
    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak.fetch_max(now, Ordering::SeqCst);
    sleep(Duration::from_millis(100)).await;
    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    Bytes::from(format!("content of {}", name))
}

async fn serve_missing() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

fn entry(subreddit: &str, id: &str, domain: &str, hint: &str, url: &str) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "title": format!("post {}", id),
            "domain": domain,
            "id": id,
            "author": "someone",
            "permalink": format!("/r/{}/comments/{}/post/", subreddit, id),
            "post_hint": hint,
            "url": url,
            "subreddit": subreddit
        }
    })
}

fn listing(children: Vec<Value>) -> Value {
    json!({"kind": "Listing", "data": {"after": null, "dist": children.len(), "children": children}})
}

/// Three direct images (one `.gifv`) and one self post
fn cute_listing(base: &str) -> Value {
    listing(vec![
        entry("cute", "p1", "i.imgur.com", "image", &format!("{}/img/a.jpg", base)),
        entry("cute", "p2", "i.imgur.com", "link", &format!("{}/img/b.png", base)),
        entry("cute", "p3", "i.redd.it", "image", &format!("{}/img/c.gifv", base)),
        entry("cute", "p4", "self.cute", "self", "https://www.reddit.com/r/cute/comments/p4/post/"),
    ])
}

fn options(server: &MockServer, root: &FsPath, feeds: &[&str], tweak: impl FnOnce(&mut Config)) -> ScrapeOptions {
    let mut config = Config::default();
    config.http.base_url = server.base.clone();
    config.scrape.output_dir = root.to_path_buf();
    config.scrape.subreddits = feeds.iter().map(|f| f.to_string()).collect();
    config.scrape.limit = 5;
    config.scrape.display_loading = false;
    tweak(&mut config);
    config.resolve().unwrap()
}

async fn run(options: ScrapeOptions) -> RunReport {
    Scraper::new(options).unwrap().run().await.unwrap()
}

#[tokio::test]
async fn test_end_to_end_single_feed() {
    let server = start_mock_server(|base| HashMap::from([("cute".to_string(), cute_listing(base))])).await;
    let root = TempDir::new().unwrap();

    let report = run(options(&server, root.path(), &["cute"], |_| {})).await;

    assert_eq!(report.feeds.len(), 1);
    assert_eq!(report.feeds[0].extracted, 3);
    assert_eq!(report.feeds[0].accepted, 3);
    assert!(root.path().join("cute").is_dir());

    let summary = &report.summary;
    assert_eq!(summary.processed(), 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.skipped + summary.failed, 0);
    assert!(summary.failed_feeds.is_empty());

    let a = std::fs::read_to_string(root.path().join("cute/a.jpg")).unwrap();
    assert_eq!(a, "content of a.jpg");
    assert!(root.path().join("cute/b.png").is_file());

    assert_eq!(report.transfers.slots_acquired, 3);
    assert_eq!(report.transfers.slots_released, 3);
    assert_eq!(report.transfers.active, 0);
}

#[tokio::test]
async fn test_gifv_downloaded_as_mp4() {
    let server = start_mock_server(|base| HashMap::from([("cute".to_string(), cute_listing(base))])).await;
    let root = TempDir::new().unwrap();

    run(options(&server, root.path(), &["cute"], |_| {})).await;

    assert!(!root.path().join("cute/c.gifv").exists());
    let mp4 = std::fs::read_to_string(root.path().join("cute/c.mp4")).unwrap();
    assert_eq!(mp4, "content of c.mp4");
}

#[tokio::test]
async fn test_second_run_skips_everything() {
    let server = start_mock_server(|base| HashMap::from([("cute".to_string(), cute_listing(base))])).await;
    let root = TempDir::new().unwrap();

    let first = run(options(&server, root.path(), &["cute"], |_| {})).await;
    assert_eq!(first.summary.succeeded, 3);

    let second = run(options(&server, root.path(), &["cute"], |_| {})).await;
    assert_eq!(second.summary.processed(), 3);
    assert_eq!(second.summary.skipped, 3);
    assert_eq!(second.summary.succeeded, 0);
    assert_eq!(second.summary.failed, 0);
}

#[tokio::test]
async fn test_existing_file_left_untouched() {
    let server = start_mock_server(|base| HashMap::from([("cute".to_string(), cute_listing(base))])).await;
    let root = TempDir::new().unwrap();

    std::fs::create_dir_all(root.path().join("cute")).unwrap();
    std::fs::write(root.path().join("cute/a.jpg"), b"already here").unwrap();

    let report = run(options(&server, root.path(), &["cute"], |_| {})).await;

    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.succeeded, 2);
    assert_eq!(std::fs::read(root.path().join("cute/a.jpg")).unwrap(), b"already here");
}

#[tokio::test]
async fn test_failed_transfer_leaves_no_partial_file() {
    let server = start_mock_server(|base| {
        HashMap::from([(
            "broken".to_string(),
            listing(vec![entry(
                "broken",
                "p9",
                "i.imgur.com",
                "image",
                &format!("{}/missing/gone.jpg", base),
            )]),
        )])
    })
    .await;
    let root = TempDir::new().unwrap();

    let report = run(options(&server, root.path(), &["broken"], |_| {})).await;

    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.processed(), 1);
    assert!(!root.path().join("broken/gone.jpg").exists());

    // Nothing on disk masks the failure, so a rerun tries again
    let rerun = run(options(&server, root.path(), &["broken"], |_| {})).await;
    assert_eq!(rerun.summary.failed, 1);
    assert_eq!(rerun.summary.skipped, 0);
}

#[tokio::test]
async fn test_missing_feed_does_not_abort_run() {
    let server = start_mock_server(|base| HashMap::from([("cute".to_string(), cute_listing(base))])).await;
    let root = TempDir::new().unwrap();

    let report = run(options(&server, root.path(), &["nosuchfeed", "cute"], |_| {})).await;

    assert_eq!(report.summary.succeeded, 3);
    assert_eq!(report.summary.failed_feeds, vec!["nosuchfeed"]);
    assert!(!root.path().join("nosuchfeed").exists());
}

#[tokio::test]
async fn test_root_only_flattens_output() {
    let server = start_mock_server(|base| HashMap::from([("cute".to_string(), cute_listing(base))])).await;
    let root = TempDir::new().unwrap();

    let report = run(options(&server, root.path(), &["cute"], |config| {
        config.scrape.root_only = true;
    }))
    .await;

    assert_eq!(report.summary.succeeded, 3);
    assert!(root.path().join("a.jpg").is_file());
    assert!(root.path().join("c.mp4").is_file());
    assert!(!root.path().join("cute").exists());
}

#[tokio::test]
async fn test_front_page_saved_under_aggregate_feed() {
    let server = start_mock_server(|base| {
        HashMap::from([(
            "frontpage".to_string(),
            listing(vec![
                entry("pics", "f1", "i.imgur.com", "image", &format!("{}/img/f1.jpg", base)),
                entry("aww", "f2", "i.redd.it", "image", &format!("{}/img/f2.png", base)),
            ]),
        )])
    })
    .await;
    let root = TempDir::new().unwrap();

    let report = run(options(&server, root.path(), &[], |config| {
        config.scrape.front_page = true;
    }))
    .await;

    assert_eq!(report.summary.succeeded, 2);
    assert!(root.path().join("frontpage/f1.jpg").is_file());
    assert!(root.path().join("frontpage/f2.png").is_file());
    assert!(!root.path().join("pics").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_bounded() {
    const MAX: usize = 3;

    let server = start_mock_server(|base| {
        let children = (0..12)
            .map(|n| {
                entry(
                    "many",
                    &format!("m{}", n),
                    "i.imgur.com",
                    "image",
                    &format!("{}/slow/m{}.jpg", base, n),
                )
            })
            .collect();
        HashMap::from([("many".to_string(), listing(children))])
    })
    .await;
    let root = TempDir::new().unwrap();

    let report = run(options(&server, root.path(), &["many"], |config| {
        config.scrape.limit = 12;
        config.scrape.max_concurrent_downloads = MAX;
    }))
    .await;

    assert_eq!(report.summary.succeeded, 12);
    assert!(report.transfers.peak_active <= MAX);
    assert!(report.transfers.peak_active >= 1);
    assert_eq!(report.transfers.slots_acquired, 12);
    assert_eq!(report.transfers.slots_released, 12);

    let server_peak = server.peak.load(Ordering::SeqCst);
    assert!(server_peak <= MAX, "server saw {} concurrent transfers", server_peak);
}

/// Listing source whose transport always fails
struct OfflineSource;

#[async_trait]
impl ListingSource for OfflineSource {
    async fn fetch(&self, feed: &str, _cursor: &FeedCursor) -> Result<Listing, FeedError> {
        Err(FeedError::FeedUnreachable {
            feed: feed.to_string(),
            reason: "dns error".to_string(),
        })
    }
}

#[tokio::test]
async fn test_unreachable_feeds_reported_per_feed() {
    let server = start_mock_server(|_| HashMap::new()).await;
    let root = TempDir::new().unwrap();

    let options = options(&server, root.path(), &["cute", "aww"], |_| {});
    let report = Scraper::with_source(options, Arc::new(OfflineSource))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.summary.processed(), 0);
    let mut failed = report.summary.failed_feeds.clone();
    failed.sort();
    assert_eq!(failed, vec!["aww", "cute"]);
    assert!(report.feeds.iter().all(|feed| matches!(
        feed.error,
        Some(FeedError::FeedUnreachable { .. })
    )));
}
