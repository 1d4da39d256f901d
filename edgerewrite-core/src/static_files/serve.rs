use crate::conf::types::StaticOriginConfig;
use crate::static_files::object::StoredObject;
use crate::static_files::{ServeError, StaticBody, StaticResponse};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use httpdate::fmt_http_date;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

pub(crate) async fn serve_object(
    path: &Path,
    object: &StoredObject,
    origin: &StaticOriginConfig,
) -> Result<StaticResponse, ServeError> {
    let metadata = fs::metadata(path).await.map_err(|_| ServeError::NotFound)?;

    if !metadata.is_file() {
        return Err(ServeError::NotFound);
    }

    // Guard against memory exhaustion.
    if metadata.len() > origin.max_file_size {
        return Err(ServeError::Forbidden);
    }

    let headers = object_headers(object, metadata.len(), metadata.modified().ok(), origin)?;

    let mut file = fs::File::open(path).await.map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ServeError::NotFound,
        std::io::ErrorKind::PermissionDenied => ServeError::Forbidden,
        _ => ServeError::Io,
    })?;

    let body = if metadata.len() <= origin.small_file_threshold {
        let mut buf = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut buf)
            .await
            .map_err(|_| ServeError::Io)?;
        StaticBody::Bytes(Bytes::from(buf))
    } else {
        StaticBody::File(file)
    };

    Ok(StaticResponse {
        status: StatusCode::OK,
        headers,
        body,
    })
}

fn object_headers(
    object: &StoredObject,
    len: u64,
    modified: Option<std::time::SystemTime>,
    origin: &StaticOriginConfig,
) -> Result<HeaderMap, ServeError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_str(&object.content_type).map_err(|_| ServeError::Io)?,
    );

    if let Some(encoding) = object.content_encoding {
        headers.insert(
            http::header::CONTENT_ENCODING,
            HeaderValue::from_static(encoding.token()),
        );
    }

    headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from(len));

    // The same client URI maps to a different object per Accept-Encoding.
    headers.insert(
        http::header::VARY,
        HeaderValue::from_static("Accept-Encoding"),
    );

    let cache_control = format!("public, max-age={}", origin.cache_max_age);
    headers.insert(
        http::header::CACHE_CONTROL,
        HeaderValue::from_str(&cache_control).map_err(|_| ServeError::Io)?,
    );

    if let Some(lm) = modified.map(fmt_http_date) {
        headers.insert(
            http::header::LAST_MODIFIED,
            HeaderValue::from_str(&lm).map_err(|_| ServeError::Io)?,
        );
    }

    Ok(headers)
}
