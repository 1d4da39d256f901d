use super::write_site;
use crate::conf::types::StaticOriginConfig;
use crate::static_files::{StaticBody, handle_static_request};
use http::StatusCode;
use pretty_assertions::assert_eq;
use std::path::Path;

fn origin(root: &Path) -> StaticOriginConfig {
    StaticOriginConfig {
        root: root.to_path_buf(),
        cache_max_age: 600,
        max_file_size: 1024,
        small_file_threshold: 16,
    }
}

fn header<'a>(resp: &'a crate::static_files::StaticResponse, name: http::HeaderName) -> &'a str {
    resp.headers.get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn serves_brotli_variant_with_convention_headers() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let resp = handle_static_request(&origin(dir.path()), "/index.html.br").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(header(&resp, http::header::CONTENT_TYPE), "text/html");
    assert_eq!(header(&resp, http::header::CONTENT_ENCODING), "br");
    assert_eq!(header(&resp, http::header::CONTENT_LENGTH), "7");
    assert_eq!(header(&resp, http::header::VARY), "Accept-Encoding");
    assert_eq!(
        header(&resp, http::header::CACHE_CONTROL),
        "public, max-age=600"
    );
    assert!(resp.headers.contains_key(http::header::LAST_MODIFIED));

    match resp.body {
        StaticBody::Bytes(b) => assert_eq!(&b[..], b"home-br"),
        _ => panic!("expected buffered body"),
    }
}

#[tokio::test]
async fn identity_object_has_no_content_encoding() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let resp = handle_static_request(&origin(dir.path()), "/about/index.html").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(header(&resp, http::header::CONTENT_TYPE), "text/html");
    assert!(!resp.headers.contains_key(http::header::CONTENT_ENCODING));
}

#[tokio::test]
async fn missing_variant_is_404() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let resp = handle_static_request(&origin(dir.path()), "/about/index.html.br").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(matches!(resp.body, StaticBody::Empty));
}

#[tokio::test]
async fn large_file_is_streamed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("big.txt"), "x".repeat(100)).unwrap();

    let resp = handle_static_request(&origin(dir.path()), "/big.txt").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(header(&resp, http::header::CONTENT_LENGTH), "100");
    assert!(matches!(resp.body, StaticBody::File(_)));
}

#[tokio::test]
async fn oversized_file_is_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("huge.txt"), "x".repeat(2048)).unwrap();

    let resp = handle_static_request(&origin(dir.path()), "/huge.txt").await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn traversal_is_403() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let resp = handle_static_request(&origin(dir.path()), "/../x").await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}
