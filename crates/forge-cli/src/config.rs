//! User settings, stored as `settings.toml` in the platform config folder:
//! - Linux: ~/.config/forge/
//! - macOS: ~/Library/Application Support/dev.homebrew-forge.Forge/
//! - Windows: %APPDATA%/homebrew-forge/Forge/config/

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use forge_report::ExportFormat;
use forge_store::CacheConfig;

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "homebrew-forge";
const APP_NAME: &str = "Forge";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub export: ExportSettings,
    pub store: StoreSettings,
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Where exports go when `--out` is not given; the working directory if unset.
    pub output_dir: Option<PathBuf>,
    /// Format identifier or extension used when `--format` is not given.
    pub format: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: ExportFormat::Markup.id().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory holding one JSON file per record.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    pub base_url: String,
    pub ttl_seconds: u64,
    pub capacity: usize,
    pub timeout_seconds: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.dnd5eapi.co/api".to_string(),
            ttl_seconds: 24 * 60 * 60,
            capacity: 256,
            timeout_seconds: 10,
        }
    }
}

impl LookupSettings {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.ttl_seconds),
            capacity: NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default location of the settings file, if the platform has one.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist and parse. The default file is optional;
    /// when it is missing or unreadable the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let Some(path) = settings_path() else {
            tracing::warn!("could not determine settings path, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        match Self::from_file(&path) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                tracing::warn!(path = %path.display(), "{error:#}, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.store
            .data_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("records")))
            .unwrap_or_else(|| PathBuf::from("forge-records"))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_format(&self) -> Result<ExportFormat> {
        self.export
            .format
            .parse()
            .context("invalid export.format in settings")
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "[export]\nformat = \"pdf\"\n\n[lookup]\nttl_seconds = 60\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.default_format().unwrap(), ExportFormat::Document);
        assert_eq!(settings.lookup.ttl_seconds, 60);
        assert_eq!(settings.lookup.capacity, 256);
        assert_eq!(settings.store, StoreSettings::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let lookup = LookupSettings {
            capacity: 0,
            ..LookupSettings::default()
        };
        assert_eq!(lookup.cache_config().capacity.get(), 1);
    }
}
