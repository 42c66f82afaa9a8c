//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, archive and follow cycle end-to-end over real HTTP.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use webtree::config::{Config, CrawlerConfig, HttpConfig};
use webtree::crawler::{crawl, Archiver, Crawler, FetchError, Fetcher, HttpFetcher};
use webtree::search::search;
use webtree::CrawlError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration archiving into `output`
fn create_test_config(output: &Path, max_depth: u32, concurrency: usize) -> Config {
    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        max_depth,
        concurrency,
        queue_capacity: 1000,
    };
    config.http = HttpConfig {
        user_agent: "webtree-tests/1.0".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    };
    config.output.directory = output.display().to_string();
    config
}

/// Directory the mock server's pages are archived under
fn host_dir(output: &Path, server: &MockServer) -> PathBuf {
    let url = url::Url::parse(&server.uri()).expect("Failed to parse base URL");
    output.join(url.host_str().expect("Failed to extract host"))
}

async fn mount_page(server: &MockServer, page: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/index.html",
        format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="{base_url}/page2">Page 2</a>
            <a href="http://elsewhere.invalid/page3">Elsewhere</a>
            <a href="/index.html">Home</a>
            </body></html>"#
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", "Content 1".to_string(), 1).await;
    mount_page(&mock_server, "/page2", "Content 2".to_string(), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 1, 2);
    let root = url::Url::parse(&format!("{base_url}/index.html")).unwrap();

    let summary = crawl(&config, root).await.expect("Crawl failed");

    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.child_tasks_queued, 2);
    assert_eq!(summary.urls_visited, 3);

    let archive = host_dir(dir.path(), &mock_server);
    assert!(std::fs::read_to_string(archive.join("index.html"))
        .unwrap()
        .contains("Page 1"));
    assert_eq!(
        std::fs::read_to_string(archive.join("page1")).unwrap(),
        "Content 1"
    );
    assert_eq!(
        std::fs::read_to_string(archive.join("page2")).unwrap(),
        "Content 2"
    );
}

#[tokio::test]
async fn test_http_error_is_archived_as_text() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/start",
        r#"<a href="/missing">gone</a>"#.to_string(),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 1, 2);
    let root = url::Url::parse(&format!("{}/start", mock_server.uri())).unwrap();

    let summary = crawl(&config, root).await.expect("Crawl failed");

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.fetch_failures, 1);

    let archived =
        std::fs::read_to_string(host_dir(dir.path(), &mock_server).join("missing")).unwrap();
    assert_eq!(archived, "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_depth_limits_link_following() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/a", r#"<a href="/b">b</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/b", r#"<a href="/c">c</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/c", r#"<a href="/d">d</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/d", "too deep".to_string(), 0).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 2, 2);
    let root = url::Url::parse(&format!("{}/a", mock_server.uri())).unwrap();

    let summary = crawl(&config, root).await.expect("Crawl failed");

    assert_eq!(summary.pages_fetched, 3);
    assert!(!host_dir(dir.path(), &mock_server).join("d").exists());
}

#[tokio::test]
async fn test_cyclic_site_fetches_each_page_once() {
    let mock_server = MockServer::start().await;

    let hub = r#"<a href="/x">x</a><a href="/y">y</a><a href="/z">z</a><a href="/hub">hub</a>"#;
    for page in ["/hub", "/x", "/y", "/z"] {
        mount_page(&mock_server, page, hub.to_string(), 1).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 5, 4);
    let root = url::Url::parse(&format!("{}/hub", mock_server.uri())).unwrap();

    let summary = crawl(&config, root).await.expect("Crawl failed");

    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(summary.urls_visited, 4);
    assert!(summary.peak_in_flight <= 4);
    // Mock expectations (one hit per page) are verified when the server drops
}

#[tokio::test]
async fn test_queue_overflow_fails_the_run() {
    let mock_server = MockServer::start().await;

    let body: String = (0..10)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    mount_page(&mock_server, "/wide", body, 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), 1, 1);
    config.crawler.queue_capacity = 2;

    let fetcher = HttpFetcher::new(&config.http).unwrap();
    let crawler = Crawler::new(
        Arc::new(fetcher),
        Archiver::new(dir.path()),
        &config.crawler,
    );
    let root = url::Url::parse(&format!("{}/wide", mock_server.uri())).unwrap();

    let result = crawler.run(root, 1).await;
    assert!(matches!(result, Err(CrawlError::QueueFull { capacity: 2 })));
}

#[tokio::test]
async fn test_http_fetcher_returns_body() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/hello", "hello world".to_string(), 1).await;

    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    let url = url::Url::parse(&format!("{}/hello", mock_server.uri())).unwrap();

    let page = fetcher.fetch(&url).await.expect("fetch failed");
    assert_eq!(page.status, 200);
    assert_eq!(page.body, "hello world");
}

#[tokio::test]
async fn test_http_fetcher_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    let url = url::Url::parse(&format!("{}/broken", mock_server.uri())).unwrap();

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        timeout_secs: 1,
        ..HttpConfig::default()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    let url = url::Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));
    assert!(err.to_string().contains("timeout"));
}

#[tokio::test]
async fn test_archive_is_searchable() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/doc",
        "first line\nthe needle line\nlast line\n".to_string(),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0, 1);
    let root = url::Url::parse(&format!("{}/doc", mock_server.uri())).unwrap();
    crawl(&config, root).await.expect("Crawl failed");

    let hits = search(dir.path(), "needle").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].line_index, 1);
    assert_eq!(hits[0].path, host_dir(dir.path(), &mock_server).join("doc"));
}
