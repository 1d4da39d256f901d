use crate::conf::types::{DeviceConfig, LogLevel, LoggingDeviceOptions};
use crate::ctx::{RequestCtx, ResponseCtx};
use crate::device::builtin::precompressed_rewrite::SelectedEncoding;
use crate::device::core::errors::DeviceError;
use crate::device::core::{Device, DeviceResult};
use crate::http_event::HttpEvent;
use anyhow::{Context, Result};
use http::HeaderMap;
use std::collections::BTreeMap;
use tracing::{debug, error, info, trace, warn};

// ----------------------------------------------------------------------------
// Emit macro (DRY-out logging calls)
// ----------------------------------------------------------------------------

macro_rules! emit {
    ($level:expr, $($fields:tt)*) => {
        match $level {
            LogLevel::Trace => trace!($($fields)*),
            LogLevel::Debug => debug!($($fields)*),
            LogLevel::Info  => info!($($fields)*),
            LogLevel::Warn  => warn!($($fields)*),
            LogLevel::Error => error!($($fields)*),
        }
    };
}

// ----------------------------------------------------------------------------
// Device implementation
// ----------------------------------------------------------------------------

pub struct StructuredLoggingDevice {
    level: LogLevel,
    include_headers: bool,
    redact_headers: Vec<String>,
}

impl StructuredLoggingDevice {
    pub fn from_config(cfg: &DeviceConfig) -> Result<Self> {
        let opts: LoggingDeviceOptions = cfg
            .parse_options()
            .context("invalid structured_logging config")?;

        Ok(Self {
            level: opts.level,
            include_headers: opts.include_headers,
            redact_headers: opts
                .redact_headers
                .into_iter()
                .map(|h| h.to_lowercase())
                .collect(),
        })
    }

    fn headers_json(&self, headers: &HeaderMap) -> Option<String> {
        if !self.include_headers {
            return None;
        }

        let headers = self.build_redacted_headers(headers);

        serde_json::to_string(&headers).ok()
    }

    fn build_redacted_headers(&self, headers: &HeaderMap) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();

        for (name, value) in headers.iter() {
            let name_str = name.as_str().to_lowercase();

            let redacted = self.redact_headers.contains(&name_str);

            let val = if redacted {
                "<redacted>".to_string()
            } else {
                match value.to_str() {
                    Ok(v) => v.to_string(),
                    Err(_) => "<binary>".to_string(),
                }
            };

            out.insert(name_str, val);
        }

        out
    }
}

impl Device for StructuredLoggingDevice {
    fn on_request(&self, ctx: &mut RequestCtx) -> DeviceResult {
        let headers = self.headers_json(&ctx.headers);
        let encoding = ctx
            .extensions
            .get::<SelectedEncoding>()
            .and_then(|s| s.0)
            .map(|e| e.token());

        emit!(
            self.level,
            event = %HttpEvent::Request.as_str(),
            method = ctx.method.as_str(),
            uri = %ctx.original_uri,
            route_path = ctx.route_path.as_str(),
            encoding = encoding,
            headers = headers.as_deref(),
        );

        DeviceResult::Continue
    }

    fn on_response(&self, ctx: &mut ResponseCtx) -> DeviceResult {
        let content_encoding = ctx
            .headers
            .get(http::header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok());

        emit!(
            self.level,
            event = %HttpEvent::Response.as_str(),
            status = ctx.status.as_u16(),
            content_encoding = content_encoding,
        );

        DeviceResult::Continue
    }

    fn on_error(&self, err: &DeviceError) {
        emit!(
            self.level,
            event = "device_error",
            fatal = err.fatal,
            message = %err.message,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn device(include_headers: bool, redact: &[&str]) -> StructuredLoggingDevice {
        StructuredLoggingDevice {
            level: LogLevel::Info,
            include_headers,
            redact_headers: redact.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, "Bearer secret".parse().unwrap());
        headers.insert(http::header::ACCEPT_ENCODING, "br".parse().unwrap());
        headers
    }

    #[test]
    fn headers_are_omitted_unless_enabled() {
        assert_eq!(device(false, &[]).headers_json(&headers()), None);
    }

    #[test]
    fn redacted_headers_are_masked() {
        let json = device(true, &["authorization"])
            .headers_json(&headers())
            .unwrap();

        let parsed: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["authorization"], "<redacted>");
        assert_eq!(parsed["accept-encoding"], "br");
    }

    #[test]
    fn from_config_lowercases_redactions() {
        let mut options = toml::Table::new();
        options.insert("include_headers".into(), true.into());
        options.insert(
            "redact_headers".into(),
            toml::Value::Array(vec!["Authorization".into()]),
        );
        let cfg = DeviceConfig {
            name: "access".into(),
            builtin: crate::conf::types::BuiltinDeviceKind::StructuredLogging,
            enabled: true,
            options,
        };

        let device = StructuredLoggingDevice::from_config(&cfg).unwrap();

        assert_eq!(device.redact_headers, vec!["authorization".to_string()]);
        assert_eq!(device.level, LogLevel::Info);
    }
}
