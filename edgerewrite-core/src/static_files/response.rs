use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tokio::fs;

#[derive(Debug, PartialEq, Eq)]
pub enum ServeError {
    NotFound,
    Forbidden,
    Io,
}

pub enum StaticBody {
    Empty,
    Bytes(Bytes),
    /// Streamed from disk in chunks.
    File(fs::File),
}

pub struct StaticResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: StaticBody,
}
