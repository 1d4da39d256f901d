use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write_pid<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format!("{}\n", std::process::id()))
        .with_context(|| format!("failed to write pid file {}", path.display()))
}

/// Best-effort.
pub fn remove_pid<P: AsRef<Path>>(path: P) {
    let _ = fs::remove_file(path);
}
