use crate::conf::types::{BuiltinDeviceKind, DeviceConfig};
use crate::device::builtin::precompressed_rewrite::PrecompressedRewriteDevice;
use crate::device::builtin::structured_logging::StructuredLoggingDevice;
use crate::device::core::Device;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

type BuiltinBuilder = fn(&DeviceConfig) -> Result<Arc<dyn Device>>;

fn build_precompressed_rewrite(cfg: &DeviceConfig) -> Result<Arc<dyn Device>> {
    Ok(Arc::new(PrecompressedRewriteDevice::from_config(cfg)?))
}

fn build_structured_logging(cfg: &DeviceConfig) -> Result<Arc<dyn Device>> {
    Ok(Arc::new(StructuredLoggingDevice::from_config(cfg)?))
}

fn builtin_builders() -> HashMap<BuiltinDeviceKind, BuiltinBuilder> {
    let mut map = HashMap::new();

    map.insert(
        BuiltinDeviceKind::PrecompressedRewrite,
        build_precompressed_rewrite as BuiltinBuilder,
    );

    map.insert(
        BuiltinDeviceKind::StructuredLogging,
        build_structured_logging as BuiltinBuilder,
    );

    map
}

/// Enabled devices, in configuration order.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: Vec<Arc<dyn Device>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_config(&mut self, devices: &[DeviceConfig]) -> Result<()> {
        let builders = builtin_builders();

        for device_cfg in devices {
            if !device_cfg.enabled {
                tracing::debug!(device = %device_cfg.name, "device disabled; skipping");
                continue;
            }

            let builder = builders
                .get(&device_cfg.builtin)
                .with_context(|| format!("unknown builtin device '{}'", device_cfg.name))?;

            let device = builder(device_cfg).with_context(|| {
                format!("failed to build builtin device '{}'", device_cfg.name)
            })?;

            self.devices.push(device);
        }

        Ok(())
    }

    pub fn all(&self) -> &[Arc<dyn Device>] {
        &self.devices
    }
}
