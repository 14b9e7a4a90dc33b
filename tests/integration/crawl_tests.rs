//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! batches end-to-end, asserting on the results file.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use sumi_harvest::config::{Config, ExtractMode};
use sumi_harvest::crawler::{crawl, run_crawl};
use sumi_harvest::HarvestError;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "Source URL\tFound link";

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.input.urls_path = dir.path().join("urls.txt").display().to_string();
    config.output.results_path = dir.path().join("found_urls.txt").display().to_string();
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

fn write_seeds(config: &Config, seeds: &[String]) {
    let mut file = std::fs::File::create(&config.input.urls_path).expect("Failed to create seeds");
    for seed in seeds {
        writeln!(file, "{}", seed).expect("Failed to write seed");
    }
}

/// Reads the results file, checks the header, and returns the data lines
fn read_results(config: &Config) -> Vec<String> {
    let content =
        std::fs::read_to_string(&config.output.results_path).expect("Failed to read results");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(HEADER), "results file must start with the header");
    assert!(content.ends_with('\n'), "results file must end with a newline");
    lines.map(str::to_string).collect()
}

async fn mount_page(server: &MockServer, page: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Collects formatted log output for assertions
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

#[tokio::test]
async fn test_relative_and_absolute_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        r#"<html><body><a href="/x">X</a> <a href="http://b.test/y">Y</a></body></html>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seed = format!("{}/", base_url);

    run_crawl(&config, vec![seed.clone()]).await.expect("Crawl failed");

    let lines: BTreeSet<String> = read_results(&config).into_iter().collect();
    let expected: BTreeSet<String> = [
        format!("{}\t{}/x", seed, base_url),
        format!("{}\thttp://b.test/y", seed),
    ]
    .into_iter()
    .collect();
    assert_eq!(lines, expected);
}

#[tokio::test]
async fn test_http_404_writes_nothing_and_logs_error() {
    let (logs, _guard) = capture_logs();

    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 404, r#"<a href="/never">never</a>"#).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seed = format!("{}/", mock_server.uri());

    run_crawl(&config, vec![seed.clone()]).await.expect("Crawl failed");

    assert!(read_results(&config).is_empty());

    let output = logs.contents();
    assert!(
        output
            .lines()
            .any(|line| line.contains("ERROR") && line.contains(&seed) && line.contains("404")),
        "expected an error log mentioning 404, got:\n{}",
        output
    );
}

#[tokio::test]
async fn test_unparseable_href_is_skipped() {
    let (logs, _guard) = capture_logs();

    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        200,
        r#"<a href="ht!tp://??">bad</a> <a href="/ok">ok</a>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seed = format!("{}/", mock_server.uri());

    run_crawl(&config, vec![seed.clone()]).await.expect("Crawl failed");

    assert_eq!(
        read_results(&config),
        vec![format!("{}\t{}/ok", seed, mock_server.uri())]
    );
    assert!(logs
        .contents()
        .lines()
        .any(|line| line.contains("ht!tp://??") && line.contains("Error parsing")));
}

#[tokio::test]
async fn test_many_seeds_disjoint_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Page i links to i+1 distinct targets; page 3 has none
    let mut expected_total = 0;
    let mut seeds = Vec::new();
    for i in 0..8 {
        let page = format!("/page{}", i);
        let link_count = if i == 3 { 0 } else { i + 1 };
        expected_total += link_count;

        let body: String = (0..link_count)
            .map(|j| format!(r#"<a href="/page{}/target{}">t</a>"#, i, j))
            .collect();
        mount_page(&mock_server, &page, 200, &body).await;
        seeds.push(format!("{}{}", base_url, page));
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    run_crawl(&config, seeds.clone()).await.expect("Crawl failed");

    let lines = read_results(&config);
    assert_eq!(lines.len(), expected_total);

    for line in &lines {
        let (source, link) = line.split_once('\t').expect("line must be tab-separated");
        assert!(!link.contains('\t'));
        assert!(seeds.iter().any(|seed| seed == source), "unknown source {}", source);
        assert!(link.starts_with(&format!("{}/", source)), "{} not under {}", link, source);
    }

    let page3 = format!("{}/page3\t", base_url);
    assert!(!lines.iter().any(|line| line.starts_with(&page3)));
}

#[tokio::test]
async fn test_failures_do_not_block_other_seeds() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/good", 200, r#"<a href="/found">f</a>"#).await;
    mount_page(&mock_server, "/error", 500, r#"<a href="/hidden">h</a>"#).await;

    // A port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seeds = vec![
        format!("http://127.0.0.1:{}/", closed_port),
        format!("{}/error", base_url),
        "not a url".to_string(),
        format!("{}/good", base_url),
    ];

    run_crawl(&config, seeds).await.expect("Crawl failed");

    assert_eq!(
        read_results(&config),
        vec![format!("{}/good\t{}/found", base_url, base_url)]
    );
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/a",
        200,
        r#"<a href="/1">1</a><a href="/2">2</a><a href="/1">again</a>"#,
    )
    .await;
    mount_page(&mock_server, "/b", 200, r#"<a href="//cdn.test/lib">lib</a>"#).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let seeds = vec![format!("{}/a", base_url), format!("{}/b", base_url)];

    run_crawl(&config, seeds.clone()).await.expect("First crawl failed");
    let mut first = read_results(&config);

    run_crawl(&config, seeds).await.expect("Second crawl failed");
    let mut second = read_results(&config);

    first.sort();
    second.sort();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_crawl_reads_seed_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/one", 200, r#"<a href="two">two</a>"#).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    std::fs::write(
        &config.input.urls_path,
        format!("\n  {}/one  \n\n# comment\n{}/one\n", base_url, base_url),
    )
    .unwrap();

    crawl(&config).await.expect("Crawl failed");

    assert_eq!(
        read_results(&config),
        vec![format!("{}/one\t{}/two", base_url, base_url)]
    );
}

#[tokio::test]
async fn test_markup_extraction_mode() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        r#"<html><body><a href=/bare>b</a><!-- <a href="/commented"> --></body></html>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.extract.mode = ExtractMode::Markup;
    let seed = format!("{}/", base_url);
    write_seeds(&config, &[seed.clone()]);

    crawl(&config).await.expect("Crawl failed");

    assert_eq!(read_results(&config), vec![format!("{}\t{}/bare", seed, base_url)]);
}

#[tokio::test]
async fn test_missing_seed_file_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let result = crawl(&config).await;

    assert!(matches!(result, Err(HarvestError::SeedInput { .. })));
    assert!(!Path::new(&config.output.results_path).exists());
}

#[tokio::test]
async fn test_unwritable_destination_fails_before_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.output.results_path = dir
        .path()
        .join("missing")
        .join("found_urls.txt")
        .display()
        .to_string();
    write_seeds(&config, &[format!("{}/", mock_server.uri())]);

    let result = crawl(&config).await;

    assert!(matches!(result, Err(HarvestError::Destination { .. })));
}
