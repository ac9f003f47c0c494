//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use corpus_harvester::config::{
    Config, CrawlerConfig, OutputConfig, RobotsConfig, RobotsPolicy, SourceConfig,
    UserAgentConfig,
};
use corpus_harvester::crawler::{crawl, Coordinator};
use corpus_harvester::extract::stable_doc_id;
use corpus_harvester::normalize::read_records;
use corpus_harvester::output::{ListAbortReason, MemorySink, RecordSink};
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with one source crawling the mock server
fn create_test_config(base_url: &str, start_paths: &[&str], records_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_docs: 10,
            request_timeout_secs: 5,
        },
        robots: RobotsConfig {
            policy: RobotsPolicy::FailOpen,
            timeout_secs: 5,
            ttl_hours: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            records_path: records_path.to_string_lossy().into_owned(),
            raw_dir: None,
        },
        sources: vec![SourceConfig {
            name: "alerts".to_string(),
            start_urls: start_paths
                .iter()
                .map(|p| format!("{}{}", base_url, p))
                .collect(),
            allow_domains: vec!["127.0.0.1".to_string()],
            article_url_contains: vec!["/article/".to_string()],
            next_page_selector: Some("a.next".to_string()),
            rate_limit_seconds: 0.0,
            max_list_pages: 3,
        }],
    }
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ),
        "text/html; charset=utf-8",
    )
}

/// One-page PDF showing `text` in Helvetica, with a valid xref table
fn one_page_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 18 Tf 72 720 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.into_bytes()
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_unreachable(server: &MockServer, page_path: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_list_pages_yield_two_article_records() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("docs.jsonl");
    let raw_dir = dir.path().join("raw");

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page(
            "Alerts",
            r#"<a href="/article/one">One</a><a class="next" href="/list/2">Next</a>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/list/2",
        html_page(
            "Alerts, page 2",
            r#"<a href="/article/two">Two</a><a class="next" href="/list/3">Next</a>"#,
        ),
    )
    .await;
    mount_unreachable(&mock_server, "/list/3").await;
    mount_page(
        &mock_server,
        "/article/one",
        html_page("First scam", "<p>Gift card   scam warning.</p>"),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/two",
        html_page("Second scam", "<p>Fake invoice warning.</p>"),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), &["/list/1"], &records_path);
    config.sources[0].max_list_pages = 2;
    config.output.raw_dir = Some(raw_dir.to_string_lossy().into_owned());

    let report = crawl(config, CancellationToken::new())
        .await
        .expect("Crawl should succeed");

    let (records, malformed) = read_records(&records_path).unwrap();
    assert_eq!(malformed, 0);
    assert_eq!(records.len(), 2);
    assert_eq!(report.total_records(), 2);
    assert_eq!(report.sources[0].list_pages_fetched, 2);

    let one = format!("{}/article/one", mock_server.uri());
    let two = format!("{}/article/two", mock_server.uri());
    assert_eq!(records[0].url, one);
    assert_eq!(records[1].url, two);
    assert!(records.iter().all(|r| r.url.contains("/article/")));

    assert_eq!(records[0].title, "First scam");
    assert_eq!(records[0].text, "First scam Gift card scam warning.");
    assert_eq!(records[0].content_type, "text/html");
    assert_eq!(records[0].doc_id, stable_doc_id(&one));

    assert!(raw_dir.join(format!("{}.html", stable_doc_id(&one))).exists());
    assert!(raw_dir.join(format!("{}.html", stable_doc_id(&two))).exists());
}

#[tokio::test]
async fn test_robots_stops_list_but_skips_single_documents() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private/\n").await;
    mount_unreachable(&mock_server, "/private/list").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page(
            "Alerts",
            r#"<a href="/article/public">Public</a><a href="/private/article/secret">Secret</a>"#,
        ),
    )
    .await;
    mount_unreachable(&mock_server, "/private/article/secret").await;
    mount_page(&mock_server, "/article/public", html_page("Public", "ok")).await;

    let config = create_test_config(
        &mock_server.uri(),
        &["/private/list", "/list/1"],
        &dir.path().join("docs.jsonl"),
    );

    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&mut sink).await.unwrap();

    let source = &report.sources[0];
    assert_eq!(sink.emitted(), 1);
    assert!(sink.records[0].url.ends_with("/article/public"));
    assert_eq!(source.robots_skips, 1);
    assert_eq!(source.list_aborts.len(), 1);
    assert_eq!(source.list_aborts[0].reason, ListAbortReason::RobotsDisallowed);
    assert_eq!(source.list_pages_fetched, 1);
}

#[tokio::test]
async fn test_document_limit_stops_crawl() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/article/{}">Item {}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/list/1", html_page("Alerts", &links)).await;
    mount_page(&mock_server, "/article/1", html_page("1", "one")).await;
    mount_page(&mock_server, "/article/2", html_page("2", "two")).await;
    for i in 3..=5 {
        mount_unreachable(&mock_server, &format!("/article/{}", i)).await;
    }

    let mut config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    config.crawler.max_docs = 2;

    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 2);
    assert!(report.quota_reached());
}

#[tokio::test]
async fn test_nested_pdfs_respect_document_limit() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page("Alerts", r#"<a href="/article/report">Report</a>"#),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/report",
        html_page(
            "Annual report",
            r#"<a href="/files/a.pdf">A</a><a href="/files/b.pdf">B</a>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/files/a.pdf",
        ResponseTemplate::new(200)
            .set_body_raw(b"this is not really a pdf".to_vec(), "application/pdf"),
    )
    .await;
    mount_unreachable(&mock_server, "/files/b.pdf").await;

    let mut config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    config.crawler.max_docs = 2;

    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 2);
    assert_eq!(report.sources[0].nested_pdf_records, 1);

    // The nested PDF is emitted before the page that links to it
    let pdf = &sink.records[0];
    assert!(pdf.url.ends_with("/files/a.pdf"));
    assert_eq!(pdf.content_type, "application/pdf");
    assert_eq!(pdf.status_code, 200);
    assert!(pdf.text.is_empty());
    assert!(pdf.title.is_empty());

    let page = &sink.records[1];
    assert!(page.url.ends_with("/article/report"));
    assert_eq!(page.title, "Annual report");
}

#[tokio::test]
async fn test_error_status_documents_are_recorded() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page(
            "Alerts",
            r#"<a href="/article/gone">Gone</a><a href="/article/broken">Broken</a>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/gone",
        ResponseTemplate::new(404).set_body_raw("<html><body>Not found</body></html>", "text/html"),
    )
    .await;
    mount_page(&mock_server, "/article/broken", ResponseTemplate::new(500)).await;

    let config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 2);
    let broken = &sink.records[0];
    let gone = &sink.records[1];
    assert_eq!(broken.status_code, 500);
    assert_eq!(gone.status_code, 404);
    assert!(gone.text.is_empty());
    assert!(gone.title.is_empty());
}

#[tokio::test]
async fn test_seen_urls_span_start_urls() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/a",
        html_page("A", r#"<a href="/article/shared">Shared</a>"#),
    )
    .await;
    mount_page(
        &mock_server,
        "/list/b",
        html_page("B", r#"<a href="/article/shared">Shared again</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/article/shared"))
        .respond_with(html_page("Shared", "once"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        &mock_server.uri(),
        &["/list/a", "/list/b"],
        &dir.path().join("d"),
    );
    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 1);
}

#[tokio::test]
async fn test_list_error_status_aborts_pagination() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/list/1", ResponseTemplate::new(503)).await;

    let config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 0);
    assert_eq!(
        report.sources[0].list_aborts[0].reason,
        ListAbortReason::HttpStatus(503)
    );
}

#[tokio::test]
async fn test_fail_closed_robots_blocks_source() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_unreachable(&mock_server, "/list/1").await;

    let mut config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    config.robots.policy = RobotsPolicy::FailClosed;

    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 0);
    assert_eq!(
        report.sources[0].list_aborts[0].reason,
        ListAbortReason::RobotsDisallowed
    );
}

#[tokio::test]
async fn test_cancelled_crawl_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("docs.jsonl");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &["/list/1"], &records_path);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = crawl(config, cancel).await.unwrap();

    assert!(report.cancelled());
    assert_eq!(report.total_records(), 0);
    let (records, _) = read_records(&records_path).unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_pdf_candidates_are_extracted() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let raw_dir = dir.path().join("raw");

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page(
            "Alerts",
            r#"<a href="/article/notice">Notice</a><a href="/article/report.pdf">Report</a>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/notice",
        ResponseTemplate::new(200)
            .set_body_raw(one_page_pdf("Fake bank warning"), "application/pdf"),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/report.pdf",
        ResponseTemplate::new(200).set_body_raw(
            one_page_pdf("Annual fraud report"),
            "application/octet-stream",
        ),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    config.output.raw_dir = Some(raw_dir.to_string_lossy().into_owned());

    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 2);

    let notice = &sink.records[0];
    assert!(notice.url.ends_with("/article/notice"));
    assert_eq!(notice.content_type, "application/pdf");
    assert!(notice.text.contains("Fake bank warning"), "got {:?}", notice.text);
    assert!(notice.title.is_empty());
    assert!(notice.published_date.is_none());

    let report = &sink.records[1];
    assert!(report.url.ends_with("/article/report.pdf"));
    assert_eq!(report.content_type, "application/octet-stream");
    assert!(report.text.contains("Annual fraud report"), "got {:?}", report.text);

    for record in &sink.records {
        assert!(raw_dir.join(format!("{}.pdf", record.doc_id)).exists());
        assert!(!raw_dir.join(format!("{}.html", record.doc_id)).exists());
    }
}

#[tokio::test]
async fn test_nested_pdf_text_is_extracted() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let raw_dir = dir.path().join("raw");

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page("Alerts", r#"<a href="/article/guide">Guide</a>"#),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/guide",
        html_page(
            "Protect yourself",
            r#"<p>Read the guide.</p><a href="/files/guide.pdf">Download</a>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/files/guide.pdf",
        ResponseTemplate::new(200)
            .set_body_raw(one_page_pdf("Never share your PIN"), "application/pdf"),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    config.output.raw_dir = Some(raw_dir.to_string_lossy().into_owned());

    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 2);
    assert_eq!(report.sources[0].nested_pdf_records, 1);

    let pdf = &sink.records[0];
    assert!(pdf.url.ends_with("/files/guide.pdf"));
    assert!(pdf.text.contains("Never share your PIN"), "got {:?}", pdf.text);
    assert!(pdf.title.is_empty());
    assert!(raw_dir.join(format!("{}.pdf", pdf.doc_id)).exists());

    let page = &sink.records[1];
    assert!(page.url.ends_with("/article/guide"));
    assert_eq!(page.title, "Protect yourself");
    assert!(raw_dir.join(format!("{}.html", page.doc_id)).exists());
}

#[tokio::test]
async fn test_missing_content_type_is_treated_as_html() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/list/1",
        html_page("Alerts", r#"<a href="/article/untyped">Untyped</a>"#),
    )
    .await;
    mount_page(
        &mock_server,
        "/article/untyped",
        ResponseTemplate::new(200)
            .insert_header("content-type", "")
            .set_body_bytes(
                b"<html><head><title>Untyped</title></head><body><p>Body text</p></body></html>"
                    .to_vec(),
            ),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &["/list/1"], &dir.path().join("d"));
    let mut coordinator = Coordinator::new(config, CancellationToken::new()).unwrap();
    let mut sink = MemorySink::new();
    coordinator.run(&mut sink).await.unwrap();

    assert_eq!(sink.emitted(), 1);
    let record = &sink.records[0];
    assert_eq!(record.content_type, "");
    assert_eq!(record.title, "Untyped");
    assert_eq!(record.text, "Untyped Body text");
}
