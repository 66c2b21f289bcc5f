//! End-to-end tests for the HTTP front door.

mod common;

use std::net::SocketAddr;
use std::path::Path;

use formdrop::config::{HttpConfig, RelayConfig};
use formdrop::http::HttpServer;
use formdrop::lifecycle::Shutdown;
use formdrop::relay::RelayClient;
use formdrop::store::RecordStore;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use tempfile::TempDir;
use tokio::net::TcpListener;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn write_site(dir: &Path) {
    std::fs::write(dir.join("index.html"), "<h1>Formdrop home</h1>").unwrap();
    std::fs::write(dir.join("message.html"), "<form>message form</form>").unwrap();
    std::fs::write(dir.join("error.html"), "<h1>nothing here</h1>").unwrap();
    std::fs::write(dir.join("style.css"), "body { margin: 0; }").unwrap();
}

async fn start_http(
    static_root: &Path,
    relay_addr: SocketAddr,
    shutdown: &Shutdown,
) -> SocketAddr {
    let config = HttpConfig {
        bind_address: "127.0.0.1:0".to_string(),
        static_root: static_root.display().to_string(),
        request_timeout_secs: 5,
    };
    let relay_config = RelayConfig {
        connect_address: relay_addr.to_string(),
        ..RelayConfig::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(&config, RelayClient::new(&relay_config));
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// An address nothing is listening on.
async fn dead_endpoint() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn post_redirects_and_persists_the_submission() {
    let db_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let (relay_addr, store, _relay_shutdown) = common::start_relay(&db_dir).await;
    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), relay_addr, &shutdown).await;

    let res = client()
        .post(format!("http://{http_addr}/message"))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body("username=Alice&message=Hi%20there")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/");

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("username"), Some("Alice"));
    assert_eq!(records[0].get("message"), Some("Hi there"));
    assert!(records[0].date().is_some());
}

#[tokio::test]
async fn post_path_is_ignored() {
    let db_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let (relay_addr, store, _relay_shutdown) = common::start_relay(&db_dir).await;
    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), relay_addr, &shutdown).await;

    let res = client()
        .post(format!("http://{http_addr}/some/other/path"))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body("n=1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_post_still_redirects_but_persists_nothing() {
    let db_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let (relay_addr, store, _relay_shutdown) = common::start_relay(&db_dir).await;
    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), relay_addr, &shutdown).await;

    let res = client()
        .post(format!("http://{http_addr}/message"))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body("badpair")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn post_with_relay_down_still_redirects() {
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), dead_endpoint().await, &shutdown).await;

    let res = client()
        .post(format!("http://{http_addr}/message"))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body("n=1")
        .send()
        .await
        .unwrap();

    // The end user gets no indication of the relay failure.
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn landing_and_form_pages_are_served() {
    let db_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let (relay_addr, _store, _relay_shutdown) = common::start_relay(&db_dir).await;
    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), relay_addr, &shutdown).await;

    let res = client()
        .get(format!("http://{http_addr}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Formdrop home"));

    let res = client()
        .get(format!("http://{http_addr}/message"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("message form"));
}

#[tokio::test]
async fn unknown_path_serves_the_404_page() {
    let db_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let (relay_addr, _store, _relay_shutdown) = common::start_relay(&db_dir).await;
    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), relay_addr, &shutdown).await;

    let res = client()
        .get(format!("http://{http_addr}/does-not-exist.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res
        .headers()
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(res.text().await.unwrap().contains("nothing here"));
}

#[tokio::test]
async fn static_asset_content_type_follows_extension() {
    let db_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();
    write_site(site_dir.path());

    let (relay_addr, _store, _relay_shutdown) = common::start_relay(&db_dir).await;
    let shutdown = Shutdown::new();
    let http_addr = start_http(site_dir.path(), relay_addr, &shutdown).await;

    let res = client()
        .get(format!("http://{http_addr}/style.css"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res
        .headers()
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/css"));
    assert!(res.text().await.unwrap().contains("margin"));
}
