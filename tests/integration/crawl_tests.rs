//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl and localize cycle end-to-end against a temporary folder.

use std::path::PathBuf;
use sumi_mirror::config::Config;
use sumi_mirror::crawler::{mirror_site, Mirror};
use sumi_mirror::storage::folder_name;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

/// Folder the mock server's pages are saved in
fn site_dir(root: &TempDir, server: &MockServer) -> PathBuf {
    let base = Url::parse(&server.uri()).expect("mock server uri");
    root.path().join(folder_name(&base))
}

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[tokio::test]
async fn test_full_mirror_single_site() {
    let server = MockServer::start().await;

    serve_html(
        &server,
        "/",
        r#"<html><body><a href="/b">B</a><img src="/logo.png"></body></html>"#,
    )
    .await;
    serve_html(&server, "/b", r#"<p>page b</p><a href="/">home</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let report = mirror_site(Config::new(root.path(), 1), &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.crawl.pages_saved, 2);
    assert_eq!(report.crawl.pages_failed, 0);
    assert_eq!(report.localize.pages_rewritten, 2);
    assert_eq!(report.root, root.path());

    let site = site_dir(&root, &server);
    assert!(site.ends_with(format!("127.0.0.1_{}", server.address().port())));

    let index = read(site.join("index.html"));
    assert!(index.contains(r#"href="./b.html""#), "{}", index);
    assert!(index.contains(r#"src="./images/logo.png""#), "{}", index);

    let b = read(site.join("b.html"));
    assert!(b.contains(r#"href="./index.html""#), "{}", b);
    assert!(b.contains("<p>page b</p>"));

    assert_eq!(std::fs::read(site.join("images").join("logo.png")).unwrap(), vec![1u8, 2, 3]);
}

#[tokio::test]
async fn test_depth_zero_saves_seed_only() {
    let server = MockServer::start().await;

    serve_html(&server, "/", r#"<a href="/next">next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let report = mirror_site(Config::new(root.path(), 0), &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.crawl.pages_saved, 1);

    // The link target was never saved, so it stays absolute
    let index = read(site_dir(&root, &server).join("index.html"));
    assert!(index.contains(&format!(r#"href="{}/next""#, server.uri())), "{}", index);
    assert!(!site_dir(&root, &server).join("next.html").exists());
}

#[tokio::test]
async fn test_shared_image_downloaded_once() {
    let server = MockServer::start().await;

    serve_html(
        &server,
        "/",
        r#"<img src="/shared.gif"><a href="/a">a</a><a href="/c">c</a>"#,
    )
    .await;
    serve_html(&server, "/a", r#"<img src="shared.gif">"#).await;
    serve_html(&server, "/c", r#"<img src="./shared.gif">"#).await;
    Mock::given(method("GET"))
        .and(path("/shared.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8], "image/gif"))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let report = mirror_site(Config::new(root.path(), 1), &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.crawl.pages_saved, 3);
    let site = site_dir(&root, &server);
    for page in ["index.html", "a.html", "c.html"] {
        let html = read(site.join(page));
        assert!(html.contains(r#"src="./images/shared.gif""#), "{}: {}", page, html);
    }
}

#[tokio::test]
async fn test_stylesheet_urls_made_absolute() {
    let server = MockServer::start().await;

    serve_html(
        &server,
        "/",
        r#"<link rel="stylesheet" href="/css/site.css"><style>p { background: url(img/p.png) }</style>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/css/site.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("body { background: url('../img/bg.png') }", "text/css"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/bg.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    mirror_site(Config::new(root.path(), 0), &format!("{}/", server.uri()))
        .await
        .unwrap();

    let site = site_dir(&root, &server);
    let css = read(site.join("css").join("site.css"));
    assert!(
        css.contains(&format!("url('{}/img/bg.png')", server.uri())),
        "{}",
        css
    );

    let index = read(site.join("index.html"));
    assert!(index.contains(r#"href="./css/site.css""#), "{}", index);
    assert!(
        index.contains(&format!("url('{}/img/p.png')", server.uri())),
        "{}",
        index
    );
}

#[tokio::test]
async fn test_failed_image_keeps_absolute_url() {
    let server = MockServer::start().await;

    serve_html(&server, "/", r#"<img src="/missing.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let report = mirror_site(Config::new(root.path(), 0), &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.crawl.pages_saved, 1);
    let site = site_dir(&root, &server);
    let index = read(site.join("index.html"));
    assert!(
        index.contains(&format!(r#"src="{}/missing.png""#, server.uri())),
        "{}",
        index
    );
    assert!(!site.join("images").join("missing.png").exists());
}

#[tokio::test]
async fn test_seed_failure_fails_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let result = mirror_site(Config::new(root.path(), 2), &format!("{}/", server.uri())).await;

    assert!(result.is_err());
    assert!(!site_dir(&root, &server).join("index.html").exists());
}

#[tokio::test]
async fn test_non_html_seed_fails_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "application/pdf"))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let result = mirror_site(
        Config::new(root.path(), 1),
        &format!("{}/file.pdf", server.uri()),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_broken_child_skipped_and_sibling_mirrored() {
    let server = MockServer::start().await;

    serve_html(
        &server,
        "/",
        r#"<a href="/gone">gone</a><a href="/here">here</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    serve_html(&server, "/here", "<p>here</p>").await;

    let root = TempDir::new().unwrap();
    let report = mirror_site(Config::new(root.path(), 1), &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.crawl.pages_saved, 2);
    assert_eq!(report.crawl.pages_failed, 1);

    let index = read(site_dir(&root, &server).join("index.html"));
    assert!(index.contains(r#"href="./here.html""#), "{}", index);
    assert!(index.contains(&format!(r#"href="{}/gone""#, server.uri())), "{}", index);
}

#[tokio::test]
async fn test_fragments_survive_localization() {
    let server = MockServer::start().await;

    serve_html(
        &server,
        "/",
        r##"<a href="/doc#intro">intro</a><a href="#top">top</a><a href="mailto:x@a.test">mail</a>"##,
    )
    .await;
    serve_html(&server, "/doc", "<h1 id=\"intro\">Doc</h1>").await;

    let root = TempDir::new().unwrap();
    let report = mirror_site(Config::new(root.path(), 1), &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.crawl.pages_saved, 2);
    let index = read(site_dir(&root, &server).join("index.html"));
    assert!(index.contains(r##"href="./doc.html#intro""##), "{}", index);
    assert!(index.contains(r##"href="#top""##), "{}", index);
    assert!(index.contains(r#"href="mailto:x@a.test""#), "{}", index);
}

#[tokio::test]
async fn test_rerun_reuses_saved_resources() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"<img src="/pic.jpg">"#, "text/html"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![9u8], "image/jpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();

    for _ in 0..2 {
        let mut mirror = Mirror::new(Config::new(root.path(), 0)).unwrap();
        let stats = mirror.crawl(&seed).await.unwrap();
        assert_eq!(stats.pages_saved, 1);
    }
}
