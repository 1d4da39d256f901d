use super::capture::capture;
use crate::rewrite::{Headers, Request, RequestRewriter, decode_event};
use pretty_assertions::assert_eq;

fn request(method: &str, uri: &str, accept_encoding: Option<&str>) -> Request {
    let headers = match accept_encoding {
        Some(value) => Headers::from([("accept-encoding", value)]),
        None => Headers::new(),
    };
    Request::new(method, uri, headers)
}

fn rewrite_uri(uri: &str, accept_encoding: Option<&str>) -> String {
    RequestRewriter::default()
        .rewrite(request("GET", uri, accept_encoding))
        .uri
}

#[test]
fn root_without_accept_encoding_gets_index() {
    assert_eq!(rewrite_uri("/", None), "/index.html");
}

#[test]
fn gzip_only_client_gets_gz_variant() {
    assert_eq!(rewrite_uri("/about", Some("gzip, deflate")), "/about.gz");
}

#[test]
fn directory_with_brotli_gets_index_br_variant() {
    assert_eq!(
        rewrite_uri("/about/", Some("br, gzip")),
        "/about/index.html.br"
    );
}

#[test]
fn identity_client_is_left_alone() {
    assert_eq!(rewrite_uri("/img.png", Some("identity")), "/img.png");
}

#[test]
fn empty_uri_is_treated_as_root() {
    assert_eq!(rewrite_uri("", None), "/index.html");
    assert_eq!(rewrite_uri("", Some("gzip")), "/index.html.gz");
}

#[test]
fn only_trailing_slash_triggers_index() {
    assert_eq!(rewrite_uri("/docs/v1/", None), "/docs/v1/index.html");
    assert_eq!(rewrite_uri("/docs/v1", None), "/docs/v1");
    assert_eq!(rewrite_uri("/docs/index.html", None), "/docs/index.html");
}

#[test]
fn brotli_preferred_regardless_of_order() {
    assert_eq!(rewrite_uri("/app.js", Some("gzip, br")), "/app.js.br");
    assert_eq!(rewrite_uri("/app.js", Some("br")), "/app.js.br");
}

#[test]
fn header_without_value_is_ignored() {
    let mut headers = Headers::new();
    headers.insert("accept-encoding", Default::default());

    let out = RequestRewriter::default().rewrite(Request::new("GET", "/a/", headers));

    assert_eq!(out.uri, "/a/index.html");
}

#[test]
fn custom_default_document() {
    let rewriter = RequestRewriter::new("default.htm");

    let out = rewriter.rewrite(request("GET", "/site/", Some("gzip")));

    assert_eq!(out.uri, "/site/default.htm.gz");
}

#[test]
fn method_and_headers_are_untouched() {
    let original = request("HEAD", "/about/", Some("br, gzip"));

    let out = RequestRewriter::default().rewrite(original.clone());

    assert_eq!(out.method, original.method);
    assert_eq!(out.headers, original.headers);
    assert_eq!(out.extra, original.extra);
}

#[test]
fn emits_one_record_with_effective_uri() {
    let (out, events) = capture(|| {
        RequestRewriter::default().rewrite(request("GET", "/about/", Some("br")))
    });

    assert_eq!(out.uri, "/about/index.html.br");
    assert_eq!(events.len(), 1);

    let record = &events[0];
    assert_eq!(record.field("event"), Some("rewrite"));
    assert_eq!(record.field("method"), Some("GET"));
    assert_eq!(record.field("uri"), Some("/about/index.html"));

    let headers: serde_json::Value = serde_json::from_str(record.field("headers").unwrap()).unwrap();
    assert_eq!(headers["accept-encoding"]["value"], "br");
}

#[test]
fn record_carries_method_verbatim() {
    let (_, events) = capture(|| {
        RequestRewriter::default().rewrite(request("PROPFIND", "/dav", None))
    });

    assert_eq!(events[0].field("method"), Some("PROPFIND"));
    assert_eq!(events[0].field("uri"), Some("/dav"));
}

#[test]
fn handle_event_rewrites_embedded_request() {
    let raw = br#"{
        "version": "1.0",
        "request": {
            "method": "GET",
            "uri": "/blog/",
            "headers": { "accept-encoding": { "value": "gzip" } }
        }
    }"#;
    let event = decode_event(raw).unwrap();

    let out = RequestRewriter::default().handle_event(event);

    assert_eq!(out.uri, "/blog/index.html.gz");
}
