use crate::http_event::HttpEvent;
use crate::rewrite::{Headers, Request, ViewerRequestEvent, select_encoding};
use serde::Serialize;

pub const DEFAULT_DOCUMENT: &str = "index.html";

/// A default document is a bare file name: non-blank, no `/`.
pub fn is_valid_default_document(document: &str) -> bool {
    !document.trim().is_empty() && !document.contains('/')
}

/// Diagnostic record emitted once per rewrite.
///
/// `uri` is the effective URI: after directory normalization, before the
/// encoding suffix is chosen.
#[derive(Debug, Serialize)]
pub struct RewriteRecord<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub headers: &'a Headers,
}

impl RewriteRecord<'_> {
    /// Emit the record. A record whose headers fail to serialize is still
    /// emitted, just without them.
    pub fn emit(&self) {
        let headers = serde_json::to_string(self.headers).ok();

        tracing::info!(
            event = %HttpEvent::Rewrite.as_str(),
            method = self.method,
            uri = self.uri,
            headers = headers.as_deref(),
            "viewer request"
        );
    }
}

/// Stateless viewer-request rewriter.
#[derive(Debug, Clone)]
pub struct RequestRewriter {
    default_document: String,
}

impl Default for RequestRewriter {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT)
    }
}

impl RequestRewriter {
    pub fn new(default_document: impl Into<String>) -> Self {
        Self {
            default_document: default_document.into(),
        }
    }

    /// Directory normalization: `"/docs/"` -> `"/docs/index.html"`.
    ///
    /// An empty URI is treated as `"/"`.
    pub fn effective_uri(&self, uri: &str) -> String {
        if uri.is_empty() {
            return format!("/{}", self.default_document);
        }

        if uri.ends_with('/') {
            let mut out = String::with_capacity(uri.len() + self.default_document.len());
            out.push_str(uri);
            out.push_str(&self.default_document);
            return out;
        }

        uri.to_string()
    }

    /// Rewrite `request.uri`. Method and headers are never touched.
    pub fn rewrite(&self, mut request: Request) -> Request {
        let uri = self.effective_uri(&request.uri);

        RewriteRecord {
            method: &request.method,
            uri: &uri,
            headers: &request.headers,
        }
        .emit();

        request.uri = match select_encoding(request.headers.value("accept-encoding")) {
            Some(encoding) => encoding.apply(&uri),
            None => uri,
        };

        request
    }

    /// Platform entry point: unwrap the event and rewrite its request.
    pub fn handle_event(&self, event: ViewerRequestEvent) -> Request {
        self.rewrite(event.request)
    }
}
