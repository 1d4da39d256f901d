/// A pre-compressed representation the edge can point a request at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Brotli,
    Gzip,
}

/// Preference order. Brotli always wins when both are accepted.
const PREFERENCE: [Encoding; 2] = [Encoding::Brotli, Encoding::Gzip];

impl Encoding {
    /// Token searched for in `Accept-Encoding`, and the `Content-Encoding` value
    /// served with the stored variant.
    pub fn token(self) -> &'static str {
        match self {
            Encoding::Brotli => "br",
            Encoding::Gzip => "gzip",
        }
    }

    /// Object key suffix of the stored variant.
    pub fn suffix(self) -> &'static str {
        match self {
            Encoding::Brotli => ".br",
            Encoding::Gzip => ".gz",
        }
    }

    pub fn all() -> [Encoding; 2] {
        PREFERENCE
    }

    /// Append this encoding's suffix to `uri`.
    pub fn apply(self, uri: &str) -> String {
        let mut out = String::with_capacity(uri.len() + 3);
        out.push_str(uri);
        out.push_str(self.suffix());
        out
    }

    /// Split a stored key into its encoding and the key of the identity object.
    ///
    /// `"/app.js.br"` -> `(Brotli, "/app.js")`.
    pub fn from_key(key: &str) -> Option<(Encoding, &str)> {
        PREFERENCE
            .into_iter()
            .find_map(|enc| key.strip_suffix(enc.suffix()).map(|base| (enc, base)))
    }
}

/// Pick the pre-compressed variant for an `Accept-Encoding` value.
///
/// This is plain substring containment, not token parsing: quality values are
/// ignored and `"brotli"` counts as accepting `br`.
pub fn select_encoding(accept_encoding: Option<&str>) -> Option<Encoding> {
    let accept_encoding = accept_encoding?;

    PREFERENCE
        .into_iter()
        .find(|enc| accept_encoding.contains(enc.token()))
}

impl serde::Serialize for Encoding {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}
