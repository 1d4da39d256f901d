use crate::conf::load_config;
use crate::conf::types::{EdgeConfig, OriginConfig};
use crate::device::core::registry::DeviceRegistry;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;

/// Everything a request reads that SIGHUP may replace.
pub struct RuntimeState {
    pub origin: OriginConfig,
    pub devices: DeviceRegistry,
    /// Listener address this state was built for. Informational only: the
    /// listener itself is fixed for the process lifetime.
    pub listen: String,
}

pub fn build_runtime_state(cfg: &EdgeConfig) -> Result<RuntimeState> {
    let mut devices = DeviceRegistry::new();
    devices.load_from_config(&cfg.devices)?;

    Ok(RuntimeState {
        origin: cfg.origin.clone(),
        devices,
        listen: cfg.server.listen.clone(),
    })
}

/// Re-read `config_path` and swap in the new state. On failure the running
/// state is left untouched.
pub async fn reload_runtime_state(config_path: &Path, state: &ArcSwap<RuntimeState>) -> Result<()> {
    let cfg = load_config(config_path)?;
    let new_state = build_runtime_state(&cfg)?;

    let old = state.load();
    if old.listen != new_state.listen {
        tracing::warn!(
            current = old.listen.as_str(),
            requested = new_state.listen.as_str(),
            "listener changes require a restart; keeping current listener"
        );
    }

    tracing::info!(
        old_devices = old.devices.all().len(),
        new_devices = new_state.devices.all().len(),
        origin = origin_kind(&new_state.origin),
        "runtime state reloaded"
    );

    state.store(Arc::new(new_state));
    Ok(())
}

pub(crate) fn origin_kind(origin: &OriginConfig) -> &'static str {
    match origin {
        OriginConfig::Static(_) => "static",
        OriginConfig::Upstream(_) => "upstream",
    }
}
