use crate::rewrite::DEFAULT_DOCUMENT;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CACHE_MAX_AGE: u64 = 3600;
const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB
const DEFAULT_SMALL_FILE_THRESHOLD: u64 = 64 * 1024; // 64 KiB

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeConfig {
    pub server: ServerConfig,
    pub origin: OriginConfig,

    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// e.g. "0.0.0.0:8080"
    pub listen: String,

    /// Pingora worker threads (Pingora default when unset)
    #[serde(default)]
    pub threads: Option<usize>,

    #[serde(default)]
    pub pid_file: Option<String>,
}

/// Where rewritten requests are resolved.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OriginConfig {
    /// Objects are files under a local directory.
    Static(StaticOriginConfig),
    /// Requests are forwarded to an HTTP origin (e.g. a bucket website endpoint).
    Upstream(UpstreamOriginConfig),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StaticOriginConfig {
    pub root: PathBuf,

    /// Cache-Control max-age in seconds
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: u64,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Files up to this size are buffered; larger ones are streamed.
    #[serde(default = "default_small_file_threshold")]
    pub small_file_threshold: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UpstreamOriginConfig {
    pub host: String,

    #[serde(default = "default_upstream_port")]
    pub port: u16,

    #[serde(default)]
    pub tls: bool,

    /// Defaults to `host`
    #[serde(default)]
    pub sni: Option<String>,

    /// Host header sent upstream. The client's Host is forwarded when unset.
    #[serde(default)]
    pub host_header: Option<String>,
}

impl UpstreamOriginConfig {
    pub fn sni(&self) -> &str {
        self.sni.as_deref().unwrap_or(&self.host)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinDeviceKind {
    PrecompressedRewrite,
    StructuredLogging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub name: String,

    pub builtin: BuiltinDeviceKind,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Device-specific options (everything else in the table)
    #[serde(flatten)]
    pub options: toml::Table,
}

impl DeviceConfig {
    /// Decode the device-specific options into `T`.
    pub fn parse_options<T: serde::de::DeserializeOwned>(&self) -> Result<T, toml::de::Error> {
        toml::Value::Table(self.options.clone()).try_into()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteDeviceOptions {
    #[serde(default = "default_document")]
    pub default_document: String,
}

impl Default for RewriteDeviceOptions {
    fn default() -> Self {
        Self {
            default_document: default_document(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingDeviceOptions {
    #[serde(default = "default_level")]
    pub level: LogLevel,

    // Headers are excluded by default.
    #[serde(default)]
    pub include_headers: bool,

    #[serde(default)]
    pub redact_headers: Vec<String>,
}

fn default_devices() -> Vec<DeviceConfig> {
    vec![DeviceConfig {
        name: "precompressed_rewrite".to_string(),
        builtin: BuiltinDeviceKind::PrecompressedRewrite,
        enabled: true,
        options: toml::Table::new(),
    }]
}

fn default_enabled() -> bool {
    true
}

fn default_document() -> String {
    DEFAULT_DOCUMENT.to_string()
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

fn default_cache_max_age() -> u64 {
    DEFAULT_CACHE_MAX_AGE
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_small_file_threshold() -> u64 {
    DEFAULT_SMALL_FILE_THRESHOLD
}

fn default_upstream_port() -> u16 {
    80
}
