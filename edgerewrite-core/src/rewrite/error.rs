use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to decode viewer-request event: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode rewritten request: {0}")]
    Encode(#[source] serde_json::Error),
}
