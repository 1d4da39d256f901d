use crate::rewrite::Encoding;
use crate::static_files::object::{StoredObject, walk};
use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of a [`precompress`] pass.
#[derive(Debug, Default)]
pub struct PrecompressReport {
    /// Variants written by this pass.
    pub written: Vec<PathBuf>,
    /// Identity objects that were too small or not compressible.
    pub skipped: usize,
}

/// Write the `.br` and `.gz` siblings the edge rewrite points at.
///
/// Only compressible identity objects of at least `min_size` bytes are
/// considered. Existing variants are left alone.
pub fn precompress(root: &Path, min_size: u64) -> Result<PrecompressReport> {
    let mut report = PrecompressReport::default();

    for (key, path) in walk(root)? {
        let object = StoredObject::from_key(&key);
        if object.content_encoding.is_some() {
            continue;
        }

        let len = std::fs::metadata(&path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();

        if len < min_size || !is_compressible_mime(&object.mime()) {
            report.skipped += 1;
            continue;
        }

        let data =
            std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;

        for encoding in Encoding::all() {
            let mut target = path.clone().into_os_string();
            target.push(encoding.suffix());
            let target = PathBuf::from(target);

            if target.exists() {
                continue;
            }

            let compressed = compress(encoding, &data)
                .with_context(|| format!("failed to compress {}", path.display()))?;
            std::fs::write(&target, compressed)
                .with_context(|| format!("failed to write {}", target.display()))?;

            tracing::debug!(
                key = key.as_str(),
                encoding = encoding.token(),
                "wrote precompressed variant"
            );
            report.written.push(target);
        }
    }

    Ok(report)
}

fn compress(encoding: Encoding, data: &[u8]) -> std::io::Result<Vec<u8>> {
    match encoding {
        Encoding::Brotli => brotli_compress(data),
        Encoding::Gzip => gzip_compress(data),
    }
}

/// Text-based and common web formats.
pub(crate) fn is_compressible_mime(mime: &mime_guess::Mime) -> bool {
    let type_ = mime.type_();
    let subtype = mime.subtype();

    if type_ == "text" {
        return true;
    }

    if type_ == "application" {
        return matches!(
            subtype.as_str(),
            "json"
                | "javascript"
                | "x-javascript"
                | "xml"
                | "xhtml+xml"
                | "rss+xml"
                | "atom+xml"
                | "wasm"
        );
    }

    type_ == "image" && subtype == "svg"
}

// Built offline, so both codecs run at their best ratio.

fn gzip_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

fn brotli_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut output = Vec::new();
    let params = brotli::enc::BrotliEncoderParams {
        quality: 11,
        lgwin: 22,
        ..Default::default()
    };
    brotli::enc::BrotliCompress(&mut std::io::Cursor::new(data), &mut output, &params)?;
    Ok(output)
}
