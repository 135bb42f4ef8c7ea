use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::Config;
use crate::scoring::ReferenceTable;

const HEADER: &str = "\
# pft-calc configuration
#
# reference: scoring standards per event, gender and age band.
#   { min, max } entries are scored by interpolation between 65 and 100.
#   Run times are in seconds; min is the slowest passing time.
#   A map of value: score entries is scored by exact lookup instead.
# storage_dir: where sessions and settings are kept.
";

/// Write a config file containing the built-in reference table, ready to edit.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = Config {
        storage_dir: None,
        reference: Some(ReferenceTable::default()),
    };
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
