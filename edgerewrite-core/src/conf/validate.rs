use crate::conf::ValidationError;
use crate::conf::types::{
    BuiltinDeviceKind, DeviceConfig, EdgeConfig, LoggingDeviceOptions, OriginConfig,
    RewriteDeviceOptions,
};
use crate::rewrite::is_valid_default_document;
use std::collections::HashSet;
use std::net::SocketAddr;

/// Semantic validation. Collects every problem instead of stopping at the first.
pub fn validate_config(cfg: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    //--------------------------------------------------------------------------
    // Server
    //--------------------------------------------------------------------------
    if cfg.server.listen.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidListen {
            listen: cfg.server.listen.clone(),
        });
    }

    if cfg.server.threads == Some(0) {
        errors.push(ValidationError::ZeroThreads);
    }

    //--------------------------------------------------------------------------
    // Origin
    //--------------------------------------------------------------------------
    match &cfg.origin {
        OriginConfig::Static(origin) => {
            if !origin.root.is_dir() {
                errors.push(ValidationError::MissingRoot {
                    root: origin.root.clone(),
                });
            }
        }
        OriginConfig::Upstream(origin) => {
            if origin.host.trim().is_empty() {
                errors.push(ValidationError::EmptyUpstreamHost);
            }
            if origin.port == 0 {
                errors.push(ValidationError::ZeroUpstreamPort);
            }
        }
    }

    //--------------------------------------------------------------------------
    // Devices
    //--------------------------------------------------------------------------
    let mut seen = HashSet::new();
    for device in &cfg.devices {
        if !seen.insert(device.name.as_str()) {
            errors.push(ValidationError::DuplicateDevice {
                name: device.name.clone(),
            });
        }
        validate_device(device, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_device(device: &DeviceConfig, errors: &mut Vec<ValidationError>) {
    let invalid_options = |e: toml::de::Error| ValidationError::InvalidDeviceOptions {
        name: device.name.clone(),
        message: e.message().to_string(),
    };

    match device.builtin {
        BuiltinDeviceKind::PrecompressedRewrite => {
            match device.parse_options::<RewriteDeviceOptions>() {
                Ok(opts) => {
                    let doc = &opts.default_document;
                    if !is_valid_default_document(doc) {
                        errors.push(ValidationError::InvalidDefaultDocument {
                            name: device.name.clone(),
                            document: doc.clone(),
                        });
                    }
                }
                Err(e) => errors.push(invalid_options(e)),
            }
        }
        BuiltinDeviceKind::StructuredLogging => {
            if let Err(e) = device.parse_options::<LoggingDeviceOptions>() {
                errors.push(invalid_options(e));
            }
        }
    }
}
