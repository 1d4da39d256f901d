use crate::static_files;
use anyhow::Result;
use std::path::Path;

pub fn precompress(dir: &Path, min_size: u64) -> Result<()> {
    let report = static_files::precompress(dir, min_size)?;

    for path in &report.written {
        println!("{}", path.display());
    }
    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped,
        "precompress finished"
    );

    Ok(())
}
