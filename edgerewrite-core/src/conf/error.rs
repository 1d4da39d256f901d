use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration in {}: {} error(s)", .path.display(), .errors.len())]
    Validation {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Individual validation failures, if this is a validation error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("server.listen '{listen}' is not a valid socket address")]
    InvalidListen { listen: String },

    #[error("server.threads must be at least 1")]
    ZeroThreads,

    #[error("origin.root '{}' is not a directory", .root.display())]
    MissingRoot { root: PathBuf },

    #[error("origin.host must not be empty")]
    EmptyUpstreamHost,

    #[error("origin.port must not be 0")]
    ZeroUpstreamPort,

    #[error("duplicate device name '{name}'")]
    DuplicateDevice { name: String },

    #[error("device '{name}' has invalid options: {message}")]
    InvalidDeviceOptions { name: String, message: String },

    #[error("device '{name}': default_document '{document}' must be a non-empty file name")]
    InvalidDefaultDocument { name: String, document: String },
}
