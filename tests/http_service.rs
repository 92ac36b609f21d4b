//! End-to-end coverage of the HTTP surface: boots a real `HttpService` on
//! an ephemeral port and drives it with `ureq`, the way a client actually
//! would.

use cratehold::config::StorageConfig;
use cratehold::http::HttpService;
use cratehold::logging::{LoggerBuilder, Manager};
use cratehold::storage::{GzipCompressor, MetadataStore};
use std::io::Read;
use std::sync::Arc;
use std::thread;
use tiny_http::Server;

struct Harness {
    base_url: String,
}

fn spawn_service(config: StorageConfig) -> Harness {
    let server = Server::http("127.0.0.1:0").expect("bind ephemeral port");
    let addr = server.server_addr().to_string();
    let metadata = Arc::new(MetadataStore::in_memory().unwrap());
    let logger = Arc::new(LoggerBuilder::new("test").build());
    let service = HttpService::new(config, metadata, Arc::new(GzipCompressor), logger);

    thread::spawn(move || service.run(&server));

    Harness { base_url: format!("http://{addr}") }
}

fn test_config(deep_dir: &std::path::Path, low_dir: &std::path::Path) -> StorageConfig {
    StorageConfig {
        server_port: 0,
        server_ip: "127.0.0.1".to_string(),
        download_prefix: "/download/".to_string(),
        deep_storage_dir: deep_dir.to_string_lossy().into_owned(),
        low_storage_dir: low_dir.to_string_lossy().into_owned(),
        storage_info: ":memory:".to_string(),
    }
}

fn upload(
    harness: &Harness,
    filename: &str,
    storage_type: &str,
    body: &'static [u8],
) -> ureq::http::Response<ureq::Body> {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(filename);
    ureq::post(format!("{}/upload", harness.base_url))
        .header("FileName", &encoded)
        .header("StorageType", storage_type)
        .send(body)
        .expect("upload request should succeed")
}

#[test]
fn uploads_and_downloads_a_low_tier_file() {
    let deep = tempfile::tempdir().unwrap();
    let low = tempfile::tempdir().unwrap();
    let harness = spawn_service(test_config(deep.path(), low.path()));

    let resp = upload(&harness, "hello.txt", "low", b"hello, world");
    assert_eq!(resp.status(), 200);

    let mut resp = ureq::get(format!("{}/download/hello.txt", harness.base_url))
        .call()
        .expect("download should succeed");
    assert_eq!(resp.status(), 200);
    let mut body = Vec::new();
    resp.body_mut().as_reader().read_to_end(&mut body).unwrap();
    assert_eq!(body, b"hello, world");
}

#[test]
fn uploads_and_downloads_a_deep_tier_file() {
    let deep = tempfile::tempdir().unwrap();
    let low = tempfile::tempdir().unwrap();
    let harness = spawn_service(test_config(deep.path(), low.path()));

    let resp = upload(&harness, "archive.bin", "deep", b"compress me please");
    assert_eq!(resp.status(), 200);

    let mut resp = ureq::get(format!("{}/download/archive.bin", harness.base_url))
        .call()
        .expect("download should succeed");
    assert_eq!(resp.status(), 200);
    let mut body = Vec::new();
    resp.body_mut().as_reader().read_to_end(&mut body).unwrap();
    assert_eq!(body, b"compress me please");
}

#[test]
fn ranged_download_returns_partial_content() {
    let deep = tempfile::tempdir().unwrap();
    let low = tempfile::tempdir().unwrap();
    let harness = spawn_service(test_config(deep.path(), low.path()));
    upload(&harness, "range.txt", "low", b"0123456789");

    let mut resp = ureq::get(format!("{}/download/range.txt", harness.base_url))
        .header("Range", "bytes=2-5")
        .call()
        .expect("ranged download should succeed");
    assert_eq!(resp.status(), 206);
    let content_range = resp.headers().get("Content-Range").unwrap().to_str().unwrap().to_string();
    assert_eq!(content_range, "bytes 2-5/10");
    let mut body = Vec::new();
    resp.body_mut().as_reader().read_to_end(&mut body).unwrap();
    assert_eq!(body, b"2345");
}

#[test]
fn out_of_range_request_is_unsatisfiable() {
    let deep = tempfile::tempdir().unwrap();
    let low = tempfile::tempdir().unwrap();
    let harness = spawn_service(test_config(deep.path(), low.path()));
    upload(&harness, "small.txt", "low", b"short");

    let result = ureq::get(format!("{}/download/small.txt", harness.base_url))
        .header("Range", "bytes=100-200")
        .call();
    let err = result.expect_err("out-of-range request must fail with 416");
    match err {
        ureq::Error::StatusCode(code) => assert_eq!(code, 416),
        other => panic!("expected a 416 status error, got {other:?}"),
    }
}

#[test]
fn unknown_url_is_rejected() {
    let deep = tempfile::tempdir().unwrap();
    let low = tempfile::tempdir().unwrap();
    let harness = spawn_service(test_config(deep.path(), low.path()));

    let result = ureq::get(format!("{}/download/nope.bin", harness.base_url)).call();
    let err = result.expect_err("unknown url must fail");
    match err {
        ureq::Error::StatusCode(code) => assert_eq!(code, 400),
        other => panic!("expected a 400 status error, got {other:?}"),
    }
}

#[test]
fn listing_page_contains_uploaded_file_link() {
    let deep = tempfile::tempdir().unwrap();
    let low = tempfile::tempdir().unwrap();
    let harness = spawn_service(test_config(deep.path(), low.path()));
    upload(&harness, "listed.txt", "low", b"content");

    let mut resp = ureq::get(&harness.base_url).call().expect("listing should succeed");
    assert_eq!(resp.status(), 200);
    let body = resp.body_mut().read_to_string().unwrap();
    assert!(body.contains("/download/listed.txt"));
    assert!(body.contains("listed.txt"));
}

#[test]
fn default_manager_logger_is_reusable_across_calls() {
    let logger_a = Manager::global().default_logger();
    let logger_b = Manager::global().default_logger();
    assert!(Arc::ptr_eq(&logger_a, &logger_b));
}
