use crate::rewrite::EventError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single header as the edge platform represents it: `{ "value": "..." }`.
///
/// Only `value` is interpreted. Anything else on the record (`multiValue`, ...)
/// is kept so the request leaves in the shape it arrived in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HeaderValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            extra: Map::new(),
        }
    }

    fn from_json(raw: Value) -> Self {
        match raw {
            Value::Object(mut record) => {
                // A non-string value counts as absent but still goes back out.
                let value = match record.remove("value") {
                    Some(Value::String(s)) => Some(s),
                    Some(other) => {
                        record.insert("value".into(), other);
                        None
                    }
                    None => None,
                };
                Self {
                    value,
                    extra: record,
                }
            }
            _ => Self::default(),
        }
    }
}

/// Request headers keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, HeaderValue>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: HeaderValue) {
        self.0.insert(name.to_ascii_lowercase(), value);
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.0.get(&name.to_ascii_lowercase())
    }

    /// The header's `value`, if the header exists and carries one.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|h| h.value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Anything other than an object means "no headers".
    fn from_json(raw: Value) -> Self {
        let mut headers = Headers::new();
        if let Value::Object(map) = raw {
            for (name, record) in map {
                headers.insert(&name, HeaderValue::from_json(record));
            }
        }
        headers
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Headers::from_json(raw))
    }
}

impl<'de> Deserialize<'de> for HeaderValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(HeaderValue::from_json(raw))
    }
}

/// Multi-value headers keep their first value.
impl From<&http::HeaderMap> for Headers {
    fn from(map: &http::HeaderMap) -> Self {
        let mut headers = Headers::new();
        for name in map.keys() {
            let value = map
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            headers.insert(
                name.as_str(),
                HeaderValue {
                    value,
                    extra: Map::new(),
                },
            );
        }
        headers
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Headers {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut headers = Headers::new();
        for (name, value) in pairs {
            headers.insert(name, HeaderValue::new(value));
        }
        headers
    }
}

/// The request as handed over by the edge platform.
///
/// Fields the rewriter does not look at (`querystring`, `cookies`, ...) are
/// carried in `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub uri: String,

    #[serde(default)]
    pub headers: Headers,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, headers: Headers) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers,
            extra: Map::new(),
        }
    }
}

/// Invocation payload: `{ "version": ..., "context": ..., "viewer": ..., "request": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerRequestEvent {
    pub request: Request,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn decode_event(raw: &[u8]) -> Result<ViewerRequestEvent, EventError> {
    serde_json::from_slice(raw).map_err(EventError::Decode)
}

pub fn encode_request(request: &Request, pretty: bool) -> Result<String, EventError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(request)
    } else {
        serde_json::to_string(request)
    };
    encoded.map_err(EventError::Encode)
}
