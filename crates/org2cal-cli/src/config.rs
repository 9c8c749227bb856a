//! Configuration loading and management.
//!
//! Layers, lowest precedence first: built-in defaults, the user config file
//! (`~/.config/org2cal/config.toml` on Linux), an explicit `--config` file,
//! then `ORG2CAL_*` environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use org2cal_core::{DEFAULT_TIMEZONE, ReportOptions};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Default org file to read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    /// Default calendar file to write.
    pub output_path: PathBuf,
    /// Timezone label stamped on every event.
    pub timezone: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("source_path", &self.source_path)
            .field("output_path", &self.output_path)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            source_path: None,
            output_path: home.join("clock.ics"),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = default_config_file() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // ORG2CAL_SOURCE_PATH, ORG2CAL_OUTPUT_PATH, ORG2CAL_TIMEZONE
        figment = figment.merge(Env::prefixed("ORG2CAL_"));

        figment.extract()
    }

    /// Builds report options, letting explicit values override the defaults.
    pub fn report_options(
        &self,
        source: Option<&Path>,
        output: Option<&Path>,
        timezone: Option<&str>,
    ) -> Result<ReportOptions> {
        let source = source
            .or(self.source_path.as_deref())
            .context("no source file given; pass --source or run 'org2cal config set --source <FILE>'")?;

        Ok(ReportOptions {
            source: source.to_path_buf(),
            output: output.unwrap_or(&self.output_path).to_path_buf(),
            timezone: timezone.unwrap_or(&self.timezone).to_string(),
        })
    }
}

/// Values persisted by `org2cal config set`.
///
/// Only keys that were explicitly saved are written, so built-in defaults
/// keep applying to the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl StoredConfig {
    /// Reads a config file, returning empty values if it doesn't exist.
    pub fn read(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Overwrites the fields that are `Some` in `update`.
    pub fn merge(&mut self, update: Self) {
        if update.source_path.is_some() {
            self.source_path = update.source_path;
        }
        if update.output_path.is_some() {
            self.output_path = update.output_path;
        }
        if update.timezone.is_some() {
            self.timezone = update.timezone;
        }
    }

    /// Writes the config file, creating its directory if needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Returns the platform-specific config directory for org2cal.
///
/// On Linux: `~/.config/org2cal`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("org2cal"))
}

/// Returns the user config file path.
pub fn default_config_file() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_org2cal() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "org2cal");
    }

    #[test]
    fn test_default_config_uses_default_timezone() {
        let config = Config::default();
        assert_eq!(config.timezone, "US-Eastern");
        assert!(config.source_path.is_none());
        assert_eq!(config.output_path.file_name().unwrap(), "clock.ics");
    }

    #[test]
    fn test_default_output_lives_in_home_dir() {
        let config = Config::default();
        let home = dirs::home_dir().unwrap();
        assert_eq!(config.output_path, home.join("clock.ics"));
    }

    #[test]
    fn test_load_from_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "source_path = \"/notes/log.org\"\ntimezone = \"Europe/Paris\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.source_path, Some(PathBuf::from("/notes/log.org")));
        assert_eq!(config.timezone, "Europe/Paris");
    }

    #[test]
    fn test_report_options_prefers_explicit_values() {
        let config = Config {
            source_path: Some(PathBuf::from("/notes/log.org")),
            output_path: PathBuf::from("/tmp/clock.ics"),
            timezone: "US-Eastern".to_string(),
        };

        let options = config
            .report_options(Some(Path::new("/other.org")), None, Some("UTC"))
            .unwrap();
        assert_eq!(options.source, PathBuf::from("/other.org"));
        assert_eq!(options.output, PathBuf::from("/tmp/clock.ics"));
        assert_eq!(options.timezone, "UTC");
    }

    #[test]
    fn test_report_options_requires_source() {
        let config = Config {
            source_path: None,
            output_path: PathBuf::from("/tmp/clock.ics"),
            timezone: "US-Eastern".to_string(),
        };

        let err = config.report_options(None, None, None).unwrap_err();
        assert!(err.to_string().contains("no source file given"));
    }

    #[test]
    fn test_stored_config_merge_keeps_unset_fields() {
        let mut stored = StoredConfig {
            source_path: Some(PathBuf::from("/a.org")),
            output_path: Some(PathBuf::from("/a.ics")),
            timezone: None,
        };
        stored.merge(StoredConfig {
            output_path: Some(PathBuf::from("/b.ics")),
            ..StoredConfig::default()
        });

        assert_eq!(stored.source_path, Some(PathBuf::from("/a.org")));
        assert_eq!(stored.output_path, Some(PathBuf::from("/b.ics")));
        assert_eq!(stored.timezone, None);
    }

    #[test]
    fn test_stored_config_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let stored = StoredConfig {
            source_path: Some(PathBuf::from("/notes/log.org")),
            output_path: None,
            timezone: Some("Asia/Tokyo".to_string()),
        };

        stored.write(&path).unwrap();

        assert_eq!(StoredConfig::read(&path).unwrap(), stored);
        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.timezone, "Asia/Tokyo");
    }

    #[test]
    fn test_stored_config_read_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredConfig::read(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(stored, StoredConfig::default());
    }
}
