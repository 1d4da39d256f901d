//! Viewer-request rewriting.
//!
//! Directory-style paths resolve to their default document, and the URI is
//! pointed at a pre-compressed variant (`.br` or `.gz`) according to the
//! client's `Accept-Encoding`.

mod encoding;
mod error;
mod request;
mod rewriter;

#[cfg(test)]
mod tests;

pub use encoding::{Encoding, select_encoding};
pub use error::EventError;
pub use request::{HeaderValue, Headers, Request, ViewerRequestEvent, decode_event, encode_request};
pub use rewriter::{DEFAULT_DOCUMENT, RequestRewriter, RewriteRecord, is_valid_default_document};
