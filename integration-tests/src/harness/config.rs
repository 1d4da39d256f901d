use edgerewrite_core::conf::{EdgeConfig, parse_config};
use std::path::Path;

const DEVICES: &str = r#"
[[devices]]
name = "precompressed_rewrite"
builtin = "precompressed_rewrite"

[[devices]]
name = "access_log"
builtin = "structured_logging"
level = "debug"
"#;

/// Render a config for a static origin rooted at `root`.
pub fn static_config(listen_port: u16, root: &Path) -> EdgeConfig {
    let text = format!(
        r#"
[server]
listen = "127.0.0.1:{listen_port}"
threads = 1

[origin]
kind = "static"
root = "{root}"
cache_max_age = 60
{DEVICES}"#,
        root = root.display(),
    );

    parse_config(&text, Path::new("static.toml")).expect("invalid static test config")
}

/// Render a config for an upstream origin on `upstream_port`.
pub fn upstream_config(listen_port: u16, upstream_port: u16, host_header: &str) -> EdgeConfig {
    let text = format!(
        r#"
[server]
listen = "127.0.0.1:{listen_port}"
threads = 1

[origin]
kind = "upstream"
host = "127.0.0.1"
port = {upstream_port}
host_header = "{host_header}"
{DEVICES}"#
    );

    parse_config(&text, Path::new("upstream.toml")).expect("invalid upstream test config")
}
