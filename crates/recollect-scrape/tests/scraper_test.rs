//! Scraper behaviour against a local HTTP server.

use std::time::Duration;

use recollect_core::defaults::SCRAPE_USER_AGENT;
use recollect_core::{Error, PageScraper};
use recollect_scrape::{HttpPageScraper, ScraperConfig};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

fn page_url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
}

#[tokio::test]
async fn test_scrape_extracts_open_graph_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(|req: &Request| {
            req.headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                == Some(SCRAPE_USER_AGENT)
        })
        .respond_with(html(
            r#"<html><head>
                <title>Fallback</title>
                <meta property="og:title" content="An Article">
                <meta property="og:description" content="About things">
                <meta property="og:image" content="/cover.png">
                <link rel="icon" href="/favicon.ico">
            </head><body></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = HttpPageScraper::with_defaults().unwrap();
    let meta = scraper
        .scrape(&page_url(&server, "/article"))
        .await
        .unwrap();

    assert_eq!(meta.title.as_deref(), Some("An Article"));
    assert_eq!(meta.description.as_deref(), Some("About things"));
    assert_eq!(
        meta.og_image,
        Some(format!("{}/cover.png", server.uri()))
    );
    assert_eq!(
        meta.fav_icon,
        Some(format!("{}/favicon.ico", server.uri()))
    );
}

#[tokio::test]
async fn test_scrape_error_status_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scraper = HttpPageScraper::with_defaults().unwrap();
    let result = scraper.scrape(&page_url(&server, "/missing")).await;

    match result {
        Err(Error::Fetch(msg)) => assert!(msg.contains("404"), "message: {}", msg),
        other => panic!("Expected Fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_timeout_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<title>late</title>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let scraper =
        HttpPageScraper::new(ScraperConfig::default().with_timeout(Duration::from_millis(200)))
            .unwrap();
    let result = scraper.scrape(&page_url(&server, "/slow")).await;

    match result {
        Err(Error::Fetch(msg)) => assert!(msg.contains("timed out"), "message: {}", msg),
        other => panic!("Expected Fetch timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_body_is_capped() {
    let server = MockServer::start().await;
    let padding = "x".repeat(4096);
    let body = format!(
        r#"<html><head><title>Early title</title><!-- {} --><meta property="og:title" content="Late title"></head></html>"#,
        padding
    );
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(html(&body))
        .mount(&server)
        .await;

    let scraper =
        HttpPageScraper::new(ScraperConfig::default().with_max_body_bytes(1024)).unwrap();
    let meta = scraper.scrape(&page_url(&server, "/big")).await.unwrap();

    // The og:title lies past the cap and is never seen.
    assert_eq!(meta.title.as_deref(), Some("Early title"));
}

#[tokio::test]
async fn test_scrape_follows_redirects_and_resolves_against_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/new/page"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/page"))
        .respond_with(html(r#"<head><link rel="shortcut icon" href="icon.png"></head>"#))
        .mount(&server)
        .await;

    let scraper = HttpPageScraper::with_defaults().unwrap();
    let meta = scraper.scrape(&page_url(&server, "/old")).await.unwrap();

    assert_eq!(
        meta.fav_icon,
        Some(format!("{}/new/icon.png", server.uri()))
    );
    assert_eq!(meta.title.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_scrape_cross_host_redirect_keeps_submitted_hostname() {
    let server = MockServer::start().await;
    let port = server.address().port();
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("http://localhost:{}/new/", port).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(html(r#"<head><link rel="icon" href="fav.png"></head><body>x</body>"#))
        .mount(&server)
        .await;

    let scraper = HttpPageScraper::with_defaults().unwrap();
    let submitted = Url::parse(&format!("http://127.0.0.1:{}/old", port)).unwrap();
    let meta = scraper.scrape(&submitted).await.unwrap();

    assert_eq!(meta.title.as_deref(), Some("127.0.0.1"));
    assert_eq!(
        meta.fav_icon,
        Some(format!("http://localhost:{}/new/fav.png", port))
    );
}

#[tokio::test]
async fn test_scrape_non_html_uses_hostname() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let scraper = HttpPageScraper::with_defaults().unwrap();
    let meta = scraper
        .scrape(&page_url(&server, "/file.pdf"))
        .await
        .unwrap();

    assert_eq!(meta.title.as_deref(), Some("127.0.0.1"));
    assert!(meta.description.is_none());
    assert!(meta.og_image.is_none());
}

#[tokio::test]
async fn test_scrape_connection_refused_is_fetch_error() {
    // Nothing listens on the discard port.
    let scraper = HttpPageScraper::new(
        ScraperConfig::default().with_timeout(Duration::from_secs(2)),
    )
    .unwrap();
    let url = Url::parse("http://127.0.0.1:9/").unwrap();
    assert!(matches!(scraper.scrape(&url).await, Err(Error::Fetch(_))));
}
