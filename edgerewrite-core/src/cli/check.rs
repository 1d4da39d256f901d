use crate::conf::types::OriginConfig;
use crate::conf::{ConfigError, EdgeConfig, load_config};
use std::path::Path;

pub fn check(path: &Path) -> anyhow::Result<()> {
    match load_config(path) {
        Ok(cfg) => {
            for line in summary(&cfg) {
                println!("✔ {line}");
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(&err);
            std::process::exit(1);
        }
    }
}

pub fn summary(cfg: &EdgeConfig) -> Vec<String> {
    let origin = match &cfg.origin {
        OriginConfig::Static(s) => format!("static origin {}", s.root.display()),
        OriginConfig::Upstream(u) => format!(
            "upstream origin {}://{}:{}",
            if u.tls { "https" } else { "http" },
            u.host,
            u.port
        ),
    };

    vec![
        "Config loaded successfully".to_string(),
        format!("listening on {}", cfg.server.listen),
        origin,
        format!(
            "{} devices enabled",
            cfg.devices.iter().filter(|d| d.enabled).count()
        ),
    ]
}

fn print_config_error(err: &ConfigError) {
    eprintln!("{err}");
    for e in err.validation_errors() {
        eprintln!("  - {e}");
    }
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Pass the config path explicitly:\n\
             \n\
             edgerewrite check --config path/to/edgerewrite.toml",
        ),

        ConfigError::Parse { .. } => Some(
            "A minimal config:\n\
             \n\
             [server]\n\
             listen = \"0.0.0.0:8080\"\n\
             \n\
             [origin]\n\
             kind = \"static\"\n\
             root = \"public\"",
        ),

        ConfigError::Validation { .. } => None,
    }
}
