use crate::conf::types::OriginConfig;
use crate::ctx::{RequestCtx, ResponseCtx};
use crate::device::core::pipeline::DevicePipeline;
use crate::device::core::registry::DeviceRegistry;
use crate::device::core::result::DeviceResult;
use crate::server::runtime::RuntimeState;
use crate::static_files::{StaticBody, handle_static_request};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::{Method, StatusCode, header};
use pingora::prelude::*;
use pingora_http::{RequestHeader, ResponseHeader};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 32 * 1024;

/// Viewer-facing edge: devices rewrite the request, then the origin answers.
pub struct EdgeGateway {
    state: Arc<ArcSwap<RuntimeState>>,
}

impl EdgeGateway {
    pub fn new(state: Arc<ArcSwap<RuntimeState>>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ProxyHttp for EdgeGateway {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        // Replaced in request_filter once the request header is known.
        RequestCtx::default()
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        upstream_peer_for(ctx).map(Box::new)
    }

    /// ACCEPT --> REWRITE --> (RESPOND | SERVE | PROXY)
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        *ctx = RequestCtx::new(req.method.clone(), req.uri.clone(), req.headers.clone());

        let state = self.state.load_full();

        match DevicePipeline::run_on_request(state.devices.all(), ctx) {
            DeviceResult::Continue => {}

            DeviceResult::Respond(resp) => {
                session.respond_error(resp.status.as_u16()).await?;
                return Ok(true);
            }

            DeviceResult::Error(err) => {
                tracing::error!("device error in on_request: {err}");
                session.respond_error(500).await?;
                return Ok(true);
            }
        }

        match &state.origin {
            OriginConfig::Static(origin) => {
                if ctx.method != Method::GET && ctx.method != Method::HEAD {
                    session
                        .respond_error(StatusCode::METHOD_NOT_ALLOWED.as_u16())
                        .await?;
                    return Ok(true);
                }

                let resp = handle_static_request(origin, &ctx.route_path).await;
                respond_with_static(session, ctx, resp, &state.devices).await
            }

            OriginConfig::Upstream(upstream) => {
                ctx.upstream = Some(upstream.clone());
                Ok(false)
            }
        }
    }

    async fn upstream_request_filter(
        &self,
        _session: &mut Session,
        upstream: &mut RequestHeader,
        ctx: &mut Self::CTX,
    ) -> Result<()> {
        apply_upstream_request(upstream, ctx)
    }

    async fn response_filter(
        &self,
        _session: &mut Session,
        upstream: &mut ResponseHeader,
        _ctx: &mut Self::CTX,
    ) -> Result<()> {
        let mut resp_ctx = ResponseCtx::new(upstream.status, upstream.headers.clone());
        run_response_devices(self.state.load().devices.all(), &mut resp_ctx);
        Ok(())
    }
}

fn upstream_peer_for(ctx: &RequestCtx) -> Result<HttpPeer> {
    let upstream = ctx
        .upstream
        .as_ref()
        .ok_or_else(|| Error::new(Custom("no upstream selected")))?;

    Ok(HttpPeer::new(
        (upstream.host.as_str(), upstream.port),
        upstream.tls,
        upstream.sni().to_string(),
    ))
}

/// Point the upstream request at the rewritten object.
fn apply_upstream_request(upstream: &mut RequestHeader, ctx: &RequestCtx) -> Result<()> {
    let uri = ctx
        .upstream_path()
        .parse()
        .map_err(|_| Error::new(Custom("rewritten path is not a valid URI")))?;
    upstream.set_uri(uri);

    if let Some(host) = ctx.upstream.as_ref().and_then(|u| u.host_header.as_deref()) {
        upstream.insert_header(header::HOST, host)?;
    }

    Ok(())
}

/// Response devices observe; the response is already decided.
fn run_response_devices(
    devices: &[Arc<dyn crate::device::core::Device>],
    resp_ctx: &mut ResponseCtx,
) {
    match DevicePipeline::run_on_response(devices, resp_ctx) {
        DeviceResult::Continue => {}
        DeviceResult::Respond(_) => {
            tracing::debug!("response override ignored in on_response");
        }
        DeviceResult::Error(err) => {
            tracing::warn!("device error on_response: {err}");
        }
    }
}

async fn respond_with_static(
    session: &mut Session,
    ctx: &RequestCtx,
    static_resp: crate::static_files::StaticResponse,
    devices: &DeviceRegistry,
) -> Result<bool> {
    let mut resp = ResponseHeader::build(static_resp.status, None)?;
    for (name, value) in static_resp.headers.iter() {
        resp.insert_header(name.clone(), value.clone())?;
    }

    session.write_response_header(Box::new(resp), false).await?;

    if ctx.method == Method::HEAD {
        session.write_response_body(None, true).await?;
    } else {
        match static_resp.body {
            StaticBody::Empty => {
                session.write_response_body(None, true).await?;
            }

            StaticBody::Bytes(bytes) => {
                session.write_response_body(Some(bytes), true).await?;
            }

            StaticBody::File(mut file) => {
                let mut buf = BytesMut::with_capacity(CHUNK_SIZE);

                loop {
                    buf.resize(CHUNK_SIZE, 0);

                    let n = file
                        .read(&mut buf[..])
                        .await
                        .map_err(|_| Error::new(Custom("static file read error")))?;

                    if n == 0 {
                        break;
                    }

                    buf.truncate(n);
                    let chunk: Bytes = buf.split().freeze();
                    session.write_response_body(Some(chunk), false).await?;
                }

                session.write_response_body(None, true).await?;
            }
        }
    }

    let mut resp_ctx = ResponseCtx::new(static_resp.status, static_resp.headers);
    run_response_devices(devices.all(), &mut resp_ctx);

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::types::UpstreamOriginConfig;
    use http::{HeaderMap, Uri};
    use pretty_assertions::assert_eq;

    fn origin(host: &str, host_header: &str) -> UpstreamOriginConfig {
        UpstreamOriginConfig {
            host: host.to_string(),
            port: 8081,
            tls: false,
            sni: None,
            host_header: Some(host_header.to_string()),
        }
    }

    fn rewritten_ctx(upstream: UpstreamOriginConfig) -> RequestCtx {
        let mut ctx = RequestCtx::new(
            Method::GET,
            Uri::from_static("/docs/?lang=en"),
            HeaderMap::new(),
        );
        ctx.route_path = "/docs/index.html.br".to_string();
        ctx.upstream = Some(upstream);
        ctx
    }

    #[test]
    fn upstream_hooks_read_the_origin_pinned_on_the_request() {
        let ctx = rewritten_ctx(origin("old.internal", "old.example"));

        let mut upstream = RequestHeader::build("GET", b"/docs/?lang=en", None).unwrap();
        upstream.insert_header(header::HOST, "viewer.example").unwrap();
        apply_upstream_request(&mut upstream, &ctx).unwrap();

        assert_eq!(upstream.uri.to_string(), "/docs/index.html.br?lang=en");
        assert_eq!(upstream.headers[header::HOST], "old.example");

        let peer = upstream_peer_for(&ctx).unwrap();
        assert_eq!(peer.sni, "old.internal");
    }

    #[test]
    fn reload_after_selection_does_not_change_the_request() {
        let state_for = |o: UpstreamOriginConfig| RuntimeState {
            origin: OriginConfig::Upstream(o),
            devices: DeviceRegistry::new(),
            listen: "127.0.0.1:8080".to_string(),
        };
        let state = ArcSwap::from_pointee(state_for(origin("old.internal", "old.example")));

        let loaded = state.load_full();
        let OriginConfig::Upstream(selected) = &loaded.origin else {
            unreachable!()
        };
        let ctx = rewritten_ctx(selected.clone());

        state.store(Arc::new(state_for(origin("new.internal", "new.example"))));

        let mut upstream = RequestHeader::build("GET", b"/docs/", None).unwrap();
        apply_upstream_request(&mut upstream, &ctx).unwrap();

        assert_eq!(upstream.headers[header::HOST], "old.example");
        assert_eq!(upstream_peer_for(&ctx).unwrap().sni, "old.internal");
    }

    #[test]
    fn no_pinned_upstream_is_an_error() {
        let ctx = RequestCtx::default();

        assert!(upstream_peer_for(&ctx).is_err());
    }

    #[test]
    fn client_host_is_kept_without_override() {
        let mut pinned = origin("bucket.internal", "unused");
        pinned.host_header = None;
        let ctx = rewritten_ctx(pinned);

        let mut upstream = RequestHeader::build("GET", b"/docs/", None).unwrap();
        upstream.insert_header(header::HOST, "viewer.example").unwrap();
        apply_upstream_request(&mut upstream, &ctx).unwrap();

        assert_eq!(upstream.headers[header::HOST], "viewer.example");
    }
}
