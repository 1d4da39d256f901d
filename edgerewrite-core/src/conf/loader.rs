use crate::conf::types::EdgeConfig;
use crate::conf::validate::validate_config;
use crate::conf::{ConfigError, ValidationError};
use std::fs;
use std::path::Path;

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    parse_config(&contents, path)
}

/// Parse and validate config text. `path` is only used for error reporting.
pub fn parse_config(contents: &str, path: &Path) -> Result<EdgeConfig, ConfigError> {
    let cfg: EdgeConfig = toml::from_str(contents).map_err(|e| ConfigError::parse(path, e))?;

    validate_config(&cfg).map_err(|errors: Vec<ValidationError>| ConfigError::Validation {
        path: path.to_path_buf(),
        errors,
    })?;

    Ok(cfg)
}
