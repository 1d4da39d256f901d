use std::path::{Component, Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    NotFound,
    Forbidden,
    BadPath,
}

/// A request path mapped onto a file inside the site root.
#[derive(Debug)]
pub struct ResolvedObject {
    /// Canonical location on disk.
    pub path: PathBuf,
    /// Decoded key, without the leading `/`.
    pub key: String,
}

/// Map a rewritten URI path onto a file under `base_dir`.
///
/// No index fallback happens here: directory URIs were already completed
/// upstream of this call, so a directory is simply not an object.
pub fn resolve_object_path(
    base_dir: &Path,
    request_path: &str,
) -> Result<ResolvedObject, ResolveError> {
    if !request_path.starts_with('/') {
        return Err(ResolveError::BadPath);
    }

    // Percent-decode ONCE
    let decoded = percent_encoding::percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadPath)?;

    let key = decoded.trim_start_matches('/');
    if key.is_empty() {
        return Err(ResolveError::NotFound);
    }

    let relative_path = PathBuf::from(key);

    // ParentDir, RootDir and Prefix are all forbidden
    for component in relative_path.components() {
        if !matches!(component, Component::Normal(_) | Component::CurDir) {
            return Err(ResolveError::Forbidden);
        }
    }

    let base_canon = base_dir
        .canonicalize()
        .map_err(|_| ResolveError::Forbidden)?;

    let target_canon = base_dir
        .join(&relative_path)
        .canonicalize()
        .map_err(|_| ResolveError::NotFound)?;

    // Symlinks must not lead outside the root
    if !target_canon.starts_with(&base_canon) {
        return Err(ResolveError::Forbidden);
    }

    if !target_canon.is_file() {
        return Err(ResolveError::NotFound);
    }

    Ok(ResolvedObject {
        path: target_canon,
        key: key.to_string(),
    })
}
