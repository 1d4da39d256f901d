use crate::static_files::list_objects;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Print the upload manifest for `dir`, one JSON object per line.
pub fn objects(dir: &Path) -> Result<()> {
    let stdout = std::io::stdout();
    write_objects(dir, stdout.lock())
}

pub fn write_objects(dir: &Path, mut out: impl Write) -> Result<()> {
    for object in list_objects(dir)? {
        serde_json::to_writer(&mut out, &object)?;
        writeln!(out)?;
    }
    Ok(())
}
