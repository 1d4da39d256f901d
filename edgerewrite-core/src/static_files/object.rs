use crate::rewrite::Encoding;
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Object metadata derived from its key.
///
/// A `.br` or `.gz` suffix marks a precompressed variant: the suffix decides
/// `Content-Encoding` and the extension beneath it decides `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub content_encoding: Option<Encoding>,
}

impl StoredObject {
    pub fn from_key(key: &str) -> Self {
        let (content_encoding, base) = match Encoding::from_key(key) {
            Some((encoding, base)) => (Some(encoding), base),
            None => (None, key),
        };

        Self {
            key: key.to_string(),
            content_type: mime_guess::from_path(base)
                .first_or_octet_stream()
                .to_string(),
            content_encoding,
        }
    }

    pub fn mime(&self) -> mime_guess::Mime {
        self.content_type
            .parse()
            .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM)
    }
}

/// Every regular file under `root`, keyed by its `/`-separated relative path.
///
/// Results are sorted by key.
pub fn list_objects(root: &Path) -> Result<Vec<StoredObject>> {
    Ok(walk(root)?
        .into_iter()
        .map(|(key, _)| StoredObject::from_key(&key))
        .collect())
}

/// `(key, path)` for every regular file under `root`, sorted by key.
pub(crate) fn walk(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    let root_str = root
        .to_str()
        .ok_or_else(|| anyhow!("non UTF-8 path: {}", root.display()))?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(root_str));

    let mut out = Vec::new();
    for entry in glob::glob(&pattern).context("invalid object glob")? {
        let path = entry.context("failed to read site directory")?;
        if !path.is_file() {
            continue;
        }

        let rel = path
            .strip_prefix(root)
            .with_context(|| format!("{} escaped {}", path.display(), root.display()))?;

        let key = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        out.push((key, path));
    }

    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}
