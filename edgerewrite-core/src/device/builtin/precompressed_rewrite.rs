use crate::conf::types::{DeviceConfig, RewriteDeviceOptions};
use crate::ctx::RequestCtx;
use crate::device::core::{Device, DeviceResult};
use crate::rewrite::{Encoding, Headers, Request, RequestRewriter, select_encoding};
use anyhow::{Context, Result};

/// Variant picked for the current request, stored in `RequestCtx::extensions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedEncoding(pub Option<Encoding>);

/// Runs the viewer-request rewriter on every request and points
/// `route_path` at the rewritten URI.
pub struct PrecompressedRewriteDevice {
    rewriter: RequestRewriter,
}

impl PrecompressedRewriteDevice {
    pub fn new(rewriter: RequestRewriter) -> Self {
        Self { rewriter }
    }

    pub fn from_config(cfg: &DeviceConfig) -> Result<Self> {
        let opts: RewriteDeviceOptions = cfg
            .parse_options()
            .context("invalid precompressed_rewrite config")?;

        Ok(Self::new(RequestRewriter::new(opts.default_document)))
    }
}

impl Device for PrecompressedRewriteDevice {
    fn on_request(&self, ctx: &mut RequestCtx) -> DeviceResult {
        let request = Request::new(
            ctx.method.as_str(),
            ctx.route_path.as_str(),
            Headers::from(&ctx.headers),
        );

        let rewritten = self.rewriter.rewrite(request);
        let selected = select_encoding(rewritten.headers.value("accept-encoding"));

        ctx.route_path = rewritten.uri;
        ctx.extensions.insert(SelectedEncoding(selected));

        DeviceResult::Continue
    }
}
