use http::{HeaderMap, HeaderValue, StatusCode};

use crate::conf::types::StaticOriginConfig;
use crate::static_files::object::StoredObject;
use crate::static_files::resolve::{ResolveError, resolve_object_path};
use crate::static_files::serve::serve_object;
use crate::static_files::{ServeError, StaticBody, StaticResponse};

/// Serve the object a rewritten request path names.
///
/// The object is never checked for before the rewrite picks a suffix, so a
/// missing precompressed variant is an ordinary 404 here.
pub async fn handle_static_request(
    origin: &StaticOriginConfig,
    request_path: &str,
) -> StaticResponse {
    let resolved = match resolve_object_path(&origin.root, request_path) {
        Ok(r) => r,
        Err(e) => return error_response(map_resolve_error(e)),
    };

    // Metadata follows the requested key, not the symlink target's name.
    let object = StoredObject::from_key(&resolved.key);

    serve_object(&resolved.path, &object, origin)
        .await
        .unwrap_or_else(|e| error_response(map_serve_error(e)))
}

fn map_resolve_error(err: ResolveError) -> StatusCode {
    match err {
        ResolveError::NotFound => StatusCode::NOT_FOUND,
        ResolveError::Forbidden => StatusCode::FORBIDDEN,
        ResolveError::BadPath => StatusCode::BAD_REQUEST,
    }
}

fn map_serve_error(err: ServeError) -> StatusCode {
    match err {
        ServeError::NotFound => StatusCode::NOT_FOUND,
        ServeError::Forbidden => StatusCode::FORBIDDEN,
        ServeError::Io => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode) -> StaticResponse {
    let mut headers = HeaderMap::new();
    headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from_static("0"));

    StaticResponse {
        status,
        headers,
        body: StaticBody::Empty,
    }
}
