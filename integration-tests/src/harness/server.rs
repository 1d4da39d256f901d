use crate::harness::config::{static_config, upstream_config};
use crate::harness::upstream::start_echo_upstream;
use crate::harness::{CapturedEvent, init_test_tracing};
use arc_swap::ArcSwap;
use edgerewrite_core::conf::EdgeConfig;
use edgerewrite_core::server::{build_edge_server, build_runtime_state};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use std::net::TcpStream;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a running edge.
pub struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    /// Edge in front of the site directory at `root`.
    pub fn start_static(root: &Path) -> Self {
        let listen_port = free_port();
        Self::start(listen_port, static_config(listen_port, root))
    }

    /// Edge in front of a fresh echo origin.
    pub fn start_upstream(host_header: &str) -> Self {
        let listen_port = free_port();
        let upstream_port = start_echo_upstream();
        Self::start(
            listen_port,
            upstream_config(listen_port, upstream_port, host_header),
        )
    }

    fn start(listen_port: u16, cfg: EdgeConfig) -> Self {
        init_test_tracing(events());

        let state = build_runtime_state(&cfg).expect("failed to build runtime state");
        let state = Arc::new(ArcSwap::from_pointee(state));

        let server = build_edge_server(&cfg, state).expect("failed to build edge server");
        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build client");

        Self { base_url, client }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Events captured so far whose `field` equals `value`.
    ///
    /// Tracing is process-global, so tests filter on something unique to them.
    pub fn events_where(&self, field: &str, value: &str) -> Vec<CapturedEvent> {
        events()
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.field(field) == Some(value))
            .cloned()
            .collect()
    }
}

fn wait_for_server(base_url: &str) {
    let addr = base_url.strip_prefix("http://").unwrap_or(base_url);
    let deadline = Instant::now() + Duration::from_secs(5);

    while TcpStream::connect(addr).is_err() {
        if Instant::now() > deadline {
            panic!("server failed to start at {base_url}");
        }
        thread::sleep(Duration::from_millis(25));
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Free port on localhost, so tests can run in parallel.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
