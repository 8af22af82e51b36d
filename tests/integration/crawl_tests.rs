//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the profiled HTTP page parser.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordcrawl::clock::{Clock, SystemClock};
use wordcrawl::config::{compile_url_patterns, parse_config, ParserConfig};
use wordcrawl::crawler::{
    CrawlSettings, Crawler, FailurePolicy, HttpPageParser, PageParser, ParallelCrawler,
};
use wordcrawl::profiler::Profiler;
use wordcrawl::CrawlError;

fn settings(max_depth: u32) -> CrawlSettings {
    CrawlSettings {
        timeout: Duration::from_secs(30),
        popular_word_count: 5,
        parallelism: 4,
        ignored_urls: vec![],
        max_depth,
        failure_policy: FailurePolicy::Abort,
    }
}

/// Builds a profiled crawler over a profiled HTTP page parser
fn profiled_crawler(
    settings: CrawlSettings,
    parser_config: &ParserConfig,
) -> (Profiler, impl Crawler) {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let profiler = Profiler::new(Arc::clone(&clock));

    let parser = profiler
        .wrap::<dyn PageParser, _>(HttpPageParser::new(parser_config).expect("Failed to build parser"))
        .expect("Failed to wrap parser");
    let crawler = profiler
        .wrap::<dyn Crawler, _>(ParallelCrawler::new(settings, Arc::new(parser), clock))
        .expect("Failed to wrap crawler");

    (profiler, crawler)
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Mounts a page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(&body))
        .expect(times)
        .mount(server)
        .await;
}

fn count_of(result: &wordcrawl::CrawlResult, word: &str) -> Option<u64> {
    result
        .word_counts
        .iter()
        .find(|(w, _)| w == word)
        .map(|(_, c)| *c)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"rust crawler <a href="{0}/page1">one</a> <a href="{0}/page2">two</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"rust rust <a href="/page2">two</a> <a href="/">home</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"crawler <a href="/page3">deep</a>"#.to_string(),
        1,
    )
    .await;
    // Two hops from the seed; beyond a max depth of 2
    mount_page(&mock_server, "/page3", "unreachable".to_string(), 0).await;

    let (profiler, crawler) = profiled_crawler(settings(2), &ParserConfig::default());
    let result = crawler
        .crawl(&[format!("{}/", base_url)])
        .await
        .expect("Crawl failed");

    assert_eq!(result.urls_visited, 3);
    assert_eq!(count_of(&result, "rust"), Some(3));
    assert_eq!(count_of(&result, "crawler"), Some(2));
    assert_eq!(count_of(&result, "unreachable"), None);
    assert_eq!(result.word_counts[0], ("rust".to_string(), 3));

    let report = profiler.report();
    assert!(report.starts_with("Run at "));
    assert!(report.contains("HttpPageParser#parse took "));
    assert!(report.contains("ParallelCrawler#crawl took "));
    assert!(!report.contains("max_parallelism"));

    let parse_line = report
        .lines()
        .position(|line| line.contains("#parse took"))
        .unwrap();
    let crawl_line = report
        .lines()
        .position(|line| line.contains("#crawl took"))
        .unwrap();
    // Keys sort by full type path: crawler::fetcher before crawler::scheduler
    assert!(parse_line < crawl_line);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ignored_urls_are_not_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"home <a href="{0}/private/secret">secret</a> <a href="{0}/public">public</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/private/secret", "classified".to_string(), 0).await;
    mount_page(&mock_server, "/public", "open".to_string(), 1).await;

    let mut limits = settings(5);
    limits.ignored_urls = compile_url_patterns(&[".*/private/.*".to_string()]).unwrap();
    let (_profiler, crawler) = profiled_crawler(limits, &ParserConfig::default());

    let result = crawler.crawl(&[format!("{}/", base_url)]).await.unwrap();

    assert_eq!(result.urls_visited, 2);
    assert_eq!(count_of(&result, "classified"), None);
    assert_eq!(count_of(&result, "open"), Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dead_link_aborts_by_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"start <a href="{}/gone">gone</a>"#, base_url),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (profiler, crawler) = profiled_crawler(settings(3), &ParserConfig::default());
    let result = crawler.crawl(&[format!("{}/", base_url)]).await;

    match result {
        Err(CrawlError::Parse { url, .. }) => assert_eq!(url, format!("{}/gone", base_url)),
        other => panic!("expected parse failure, got {:?}", other),
    }
    // The failed crawl is still timed
    assert!(profiler.report().contains("ParallelCrawler#crawl took "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dead_link_skipped_when_configured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"start <a href="{0}/gone">gone</a> <a href="{0}/alive">alive</a>"#,
            base_url
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/alive", "survivor".to_string(), 1).await;

    let mut limits = settings(3);
    limits.failure_policy = FailurePolicy::Skip;
    let (_profiler, crawler) = profiled_crawler(limits, &ParserConfig::default());

    let result = crawler.crawl(&[format!("{}/", base_url)]).await.unwrap();

    assert_eq!(result.urls_visited, 3);
    assert_eq!(count_of(&result, "survivor"), Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_crawl_local_files_from_config() {
    let dir = TempDir::new().unwrap();
    let write_page = |name: &str, body: &str| {
        std::fs::write(
            dir.path().join(name),
            format!("<html><body>{}</body></html>", body),
        )
        .unwrap();
    };
    write_page(
        "index.html",
        r#"the quick brown fox <a href="second.html">next</a>"#,
    );
    write_page(
        "second.html",
        r#"the lazy dog and the fox <a href="index.html">back</a>"#,
    );

    let start = Url::from_file_path(dir.path().join("index.html")).unwrap();
    let config = parse_config(&format!(
        r#"
[crawler]
start-pages = ["{}"]
max-depth = 4
popular-word-count = 3
timeout-seconds = 30
parallelism = 2

[parser]
ignored-words = ["^.{{1,3}}$"]
"#,
        start
    ))
    .expect("Invalid config");

    let settings = CrawlSettings::from_config(&config.crawler).unwrap();
    let (_profiler, crawler) = profiled_crawler(settings, &config.parser);

    let result = crawler.crawl(&config.crawler.start_pages).await.unwrap();

    assert_eq!(result.urls_visited, 2);
    // "the", "fox", "dog", "and" are ignored (three letters or fewer)
    assert_eq!(
        result.word_counts,
        vec![
            ("brown".to_string(), 1),
            ("quick".to_string(), 1),
            ("back".to_string(), 1),
        ]
    );
}
