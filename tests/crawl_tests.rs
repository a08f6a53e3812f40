//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up mock HTTP servers and exercise the
//! full crawl cycle end-to-end: claiming, fetching, content dispatch, link
//! fan-out, and the persisted ledger.

use gleaner::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use gleaner::crawler::run_crawl;
use gleaner::state::VisitStatus;
use gleaner::storage::VisitLedger;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted in a scratch directory
fn create_test_config(seed_url: &str, dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            request_delay_ms: 0, // No throttling in tests
            max_concurrent_fetches: 8,
            skip_substrings: vec![],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            data_dir: dir.path().join("data").to_string_lossy().into_owned(),
            status_file: dir
                .path()
                .join("data/visited.json")
                .to_string_lossy()
                .into_owned(),
            external_links_file: dir
                .path()
                .join("extralinks.txt")
                .to_string_lossy()
                .into_owned(),
        },
    }
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

fn page_response(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(html_page(title, body))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_crawl_visits_each_page_exactly_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // A links to B and C; B links to C again. C must still only be
    // fetched once, whichever branch claims it first.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response(
            "Home",
            &format!(
                r#"<main><p>Welcome home</p></main><a href="{base}/b">B</a><a href="{base}/c">C</a>"#
            ),
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(page_response(
            "Page B",
            &format!(r#"<main><p>Content of B</p></main><a href="{base}/c">C</a>"#),
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(page_response("Page C", "<main><p>Content of C</p></main>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base), &dir);
    let report = run_crawl(config, false).await.expect("Crawl failed");

    assert_eq!(report.counts.success, 3);
    assert_eq!(report.counts.failed, 0);
    assert_eq!(report.counts.pending, 0);

    // All three pages recorded as success in the persisted ledger
    let ledger = VisitLedger::load(&dir.path().join("data/visited.json")).unwrap();
    for page in ["/", "/b", "/c"] {
        assert_eq!(
            ledger.status_of(&format!("{}{}", base, page)),
            Some(VisitStatus::Success),
            "expected success for {}",
            page
        );
    }

    // One flat text file per page, holding the main-region text
    let home = std::fs::read_to_string(dir.path().join("data/127.0.0.1_index.txt")).unwrap();
    assert!(home.contains("Welcome home"));
    let page_b = std::fs::read_to_string(dir.path().join("data/127.0.0.1_b.txt")).unwrap();
    assert!(page_b.contains("Content of B"));
    let page_c = std::fs::read_to_string(dir.path().join("data/127.0.0.1_c.txt")).unwrap();
    assert!(page_c.contains("Content of C"));
}

#[tokio::test]
async fn test_failed_fetch_marks_url_failed_and_prunes_subtree() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response(
            "Home",
            &format!(r#"<a href="{base}/dead">Dead</a>"#),
        ))
        .mount(&server)
        .await;

    // The 404 body carries a link; it must never be followed because
    // failed pages are pruned before link extraction.
    Mock::given(method("GET"))
        .and(path("/dead"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(html_page(
                    "Gone",
                    &format!(r#"<a href="{base}/hidden">Hidden</a>"#),
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(page_response("Hidden", "<p>Should never be fetched</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base), &dir);
    let report = run_crawl(config, false).await.expect("Crawl failed");

    assert_eq!(report.counts.success, 1);
    assert_eq!(report.counts.failed, 1);

    let ledger = VisitLedger::load(&dir.path().join("data/visited.json")).unwrap();
    assert_eq!(
        ledger.status_of(&format!("{}/dead", base)),
        Some(VisitStatus::Failed)
    );
    assert_eq!(ledger.status_of(&format!("{}/hidden", base)), None);

    // Failed pages leave no document behind
    assert!(!dir.path().join("data/127.0.0.1_dead.txt").exists());
}

#[tokio::test]
async fn test_external_links_logged_but_never_crawled() {
    let server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base = server.uri();
    let external_url = format!("{}/page", other_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response(
            "Home",
            &format!(r#"<a href="{external_url}">Elsewhere</a>"#),
        ))
        .mount(&server)
        .await;

    // Same host, different port: out of domain
    Mock::given(method("GET"))
        .respond_with(page_response("Other", "<p>Other site</p>"))
        .expect(0)
        .mount(&other_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base), &dir);
    let report = run_crawl(config, false).await.expect("Crawl failed");

    assert_eq!(report.counts.total(), 1);

    let log = std::fs::read_to_string(dir.path().join("extralinks.txt")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), vec![external_url.as_str()]);

    // External URLs never enter the ledger
    let ledger = VisitLedger::load(&dir.path().join("data/visited.json")).unwrap();
    assert_eq!(ledger.status_of(&external_url), None);
}

#[tokio::test]
async fn test_pdf_url_routed_to_binary_download() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pdf_bytes: &[u8] = b"%PDF-1.4\n1 0 obj\n<< >>\nendobj\n%%EOF";

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response(
            "Home",
            &format!(r#"<a href="{base}/files/report.pdf">Report</a>"#),
        ))
        .mount(&server)
        .await;

    // Served with a misleading content type; the URL path alone decides
    // the binary route.
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(pdf_bytes)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base), &dir);
    let report = run_crawl(config, false).await.expect("Crawl failed");

    assert_eq!(report.counts.success, 2);

    let saved = std::fs::read(dir.path().join("data/127.0.0.1_files_report.pdf.pdf")).unwrap();
    assert_eq!(saved, pdf_bytes);

    // No text extraction happened for the PDF URL
    assert!(!dir.path().join("data/127.0.0.1_files_report.pdf.txt").exists());

    let ledger = VisitLedger::load(&dir.path().join("data/visited.json")).unwrap();
    assert_eq!(
        ledger.status_of(&format!("{}/files/report.pdf", base)),
        Some(VisitStatus::Success)
    );
}

#[tokio::test]
async fn test_resume_never_refetches_terminal_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response(
            "Home",
            &format!(r#"<a href="{base}/done">Done</a><a href="{base}/new">New</a>"#),
        ))
        .mount(&server)
        .await;

    // Terminal in the previous run's ledger, so the resumed crawl must
    // not touch it.
    Mock::given(method("GET"))
        .and(path("/done"))
        .respond_with(page_response("Done", "<p>Already harvested</p>"))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(page_response("New", "<p>Fresh page</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data/visited.json"),
        format!(r#"{{"{}/done": "success"}}"#, base),
    )
    .unwrap();

    let config = create_test_config(&format!("{}/", base), &dir);
    let report = run_crawl(config, false).await.expect("Crawl failed");

    // Seed + /new fetched this run; /done carried over untouched
    assert_eq!(report.counts.success, 3);

    let ledger = VisitLedger::load(&dir.path().join("data/visited.json")).unwrap();
    assert_eq!(
        ledger.status_of(&format!("{}/done", base)),
        Some(VisitStatus::Success)
    );
}

#[tokio::test]
async fn test_fresh_crawl_ignores_previous_ledger() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response("Home", "<p>Home again</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data/visited.json"),
        format!(r#"{{"{}/": "success"}}"#, base),
    )
    .unwrap();

    let config = create_test_config(&format!("{}/", base), &dir);
    let report = run_crawl(config, true).await.expect("Crawl failed");

    assert_eq!(report.counts.total(), 1);
}

#[tokio::test]
async fn test_skip_list_filters_children() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page_response(
            "Home",
            &format!(
                r#"<a href="{base}/vendor/lxml/doc">Noise</a><a href="{base}/about">About</a>"#
            ),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vendor/lxml/doc"))
        .respond_with(page_response("Noise", "<p>Vendor junk</p>"))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(page_response("About", "<p>About us</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base), &dir);
    config.crawler.skip_substrings = vec!["lxml".to_string()];
    let report = run_crawl(config, false).await.expect("Crawl failed");

    assert_eq!(report.counts.total(), 2);

    let ledger = VisitLedger::load(&dir.path().join("data/visited.json")).unwrap();
    assert_eq!(ledger.status_of(&format!("{}/vendor/lxml/doc", base)), None);
}
