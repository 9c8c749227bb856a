//! Implementation of `org2cal config show` and `org2cal config set`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::Config;
use crate::config::{StoredConfig, default_config_file};

/// Print the effective configuration.
pub fn show<W: Write>(writer: &mut W, config: &Config, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, config)
            .context("failed to serialize config")?;
        writeln!(writer)?;
        return Ok(());
    }

    let source = config
        .source_path
        .as_ref()
        .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string());
    writeln!(writer, "Source:   {source}")?;
    writeln!(writer, "Output:   {}", config.output_path.display())?;
    writeln!(writer, "Timezone: {}", config.timezone)?;
    Ok(())
}

/// Persist new defaults and return the file written.
///
/// Writes to `config_path` when given, otherwise to the user config file.
/// Keys not mentioned in `update` keep their saved values.
pub fn set(config_path: Option<&Path>, update: StoredConfig) -> Result<PathBuf> {
    if update == StoredConfig::default() {
        anyhow::bail!("nothing to set; pass --source, --output or --timezone");
    }

    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_file().context("could not determine config directory")?,
    };

    let mut stored = StoredConfig::read(&path)?;
    stored.merge(update);
    stored.write(&path)?;

    tracing::debug!(path = %path.display(), ?stored, "saved configuration");
    Ok(path)
}
