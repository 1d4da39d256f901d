use crate::conf::types::UpstreamOriginConfig;
use http::{Extensions, HeaderMap, Method, Uri};

/// Canonical request context passed through the device pipeline
#[derive(Debug)]
pub struct RequestCtx {
    /// HTTP method (immutable)
    pub method: Method,

    /// Original URI as received from the client (immutable, for logging/debugging)
    pub original_uri: Uri,

    /// Path used to locate the object at the origin (mutable by devices)
    pub route_path: String,

    /// Headers (mutable by devices)
    pub headers: HeaderMap,

    /// Request-scoped typed extensions (NOT forwarded, NOT logged).
    pub extensions: Extensions,

    /// Upstream selected for this request. Pinned once so a reload cannot
    /// change it halfway through the proxy hooks.
    pub upstream: Option<UpstreamOriginConfig>,
}

impl RequestCtx {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let route_path = uri.path().to_string();

        Self {
            method,
            original_uri: uri,
            route_path,
            headers,
            extensions: Extensions::new(),
            upstream: None,
        }
    }

    /// Path and query sent to an upstream origin.
    pub fn upstream_path(&self) -> String {
        match self.original_uri.query() {
            Some(query) => format!("{}?{}", self.route_path, query),
            None => self.route_path.clone(),
        }
    }
}

impl Default for RequestCtx {
    fn default() -> Self {
        Self::new(Method::GET, Uri::from_static("/"), HeaderMap::new())
    }
}
