use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use reqwest::header::ACCEPT_ENCODING;

fn echoed(srv: &TestServer, path: &str, accept_encoding: Option<&str>) -> (String, String) {
    let mut req = srv.get(path);
    if let Some(ae) = accept_encoding {
        req = req.header(ACCEPT_ENCODING, ae);
    }

    let res = req.send().unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().unwrap();
    let (path, host) = body.split_once('\n').expect("unexpected echo body");
    (path.to_string(), host.to_string())
}

#[test]
fn upstream_receives_rewritten_path() {
    let srv = TestServer::start_upstream("bucket.example");

    let (path, _) = echoed(&srv, "/docs/", Some("gzip, br"));

    assert_eq!(path, "/docs/index.html.br");
}

#[test]
fn query_string_survives_rewrite() {
    let srv = TestServer::start_upstream("bucket.example");

    let (path, _) = echoed(&srv, "/docs/?lang=en", Some("gzip"));

    assert_eq!(path, "/docs/index.html.gz?lang=en");
}

#[test]
fn identity_request_is_forwarded_unchanged() {
    let srv = TestServer::start_upstream("bucket.example");

    let (path, _) = echoed(&srv, "/app.css", None);

    assert_eq!(path, "/app.css");
}

#[test]
fn host_header_is_overridden() {
    let srv = TestServer::start_upstream("bucket.example");

    let (_, host) = echoed(&srv, "/", None);

    assert_eq!(host, "bucket.example");
}
