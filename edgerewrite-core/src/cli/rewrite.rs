use crate::rewrite::{RequestRewriter, decode_event, encode_request, is_valid_default_document};
use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::path::Path;

/// Rewrite one viewer-request event read from `event` (stdin when `None`)
/// and print the resulting request.
pub fn rewrite(event: Option<&Path>, default_document: &str, pretty: bool) -> Result<()> {
    let input: Box<dyn Read> = match event {
        Some(path) => Box::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open event {}", path.display()))?,
        ),
        None => Box::new(std::io::stdin().lock()),
    };

    let stdout = std::io::stdout();
    rewrite_event(input, stdout.lock(), default_document, pretty)
}

pub fn rewrite_event(
    mut input: impl Read,
    mut output: impl Write,
    default_document: &str,
    pretty: bool,
) -> Result<()> {
    if !is_valid_default_document(default_document) {
        bail!("default document '{default_document}' must be a non-empty file name");
    }

    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .context("failed to read event")?;

    let event = decode_event(&buf)?;
    let request = RequestRewriter::new(default_document).handle_event(event);

    let json = encode_request(&request, pretty)?;
    writeln!(output, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rewrites_event_to_request_json() {
        let event = br#"{"request":{"method":"GET","uri":"/docs/","headers":{"accept-encoding":{"value":"gzip, br"}}}}"#;
        let mut out = Vec::new();

        rewrite_event(&event[..], &mut out, "index.html", false).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["uri"], "/docs/index.html.br");
        assert_eq!(json["method"], "GET");
        assert_eq!(json["headers"]["accept-encoding"]["value"], "gzip, br");
    }

    #[test]
    fn default_document_must_be_a_file_name() {
        let event = br#"{"request":{"method":"GET","uri":"/","headers":{}}}"#;

        for document in ["", "  ", "docs/index.html"] {
            let mut out = Vec::new();

            let err = rewrite_event(&event[..], &mut out, document, false).unwrap_err();

            assert!(err.to_string().contains("must be a non-empty file name"));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn malformed_event_is_an_error() {
        let mut out = Vec::new();

        let err = rewrite_event(&b"not json"[..], &mut out, "index.html", false).unwrap_err();

        assert!(err.to_string().contains("failed to decode viewer-request event"));
        assert!(out.is_empty());
    }
}
