//! Sidecar naming rules loaded from reclaim.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

// Embed the default rules directly in the binary at compile time
const RECLAIM_TOML: &str = include_str!("../reclaim.toml");

/// How sidecar artifacts are named relative to a database's primary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclaimConfig {
    /// Appended to the logical name to form the management directory name
    pub management_suffix: String,
    /// Appended to the primary path to form the notification file path
    pub note_suffix: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} {value:?}: a suffix must start with '.' and contain no path separator")]
    InvalidSuffix { key: &'static str, value: String },
}

/// Structure to deserialize the TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    sidecars: SidecarsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SidecarsConfig {
    management_suffix: Option<String>,
    note_suffix: Option<String>,
}

impl ReclaimConfig {
    /// The rules shipped in the embedded reclaim.toml, which must set every key
    pub fn embedded() -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(RECLAIM_TOML).context("Failed to parse embedded reclaim rules")?;

        Ok(Self {
            management_suffix: file
                .sidecars
                .management_suffix
                .context("Embedded reclaim rules lack sidecars.management_suffix")?,
            note_suffix: file
                .sidecars
                .note_suffix
                .context("Embedded reclaim rules lack sidecars.note_suffix")?,
        })
    }

    /// Overlay the keys present in a TOML document onto this config
    fn merge_toml(mut self, content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse reclaim TOML")?;

        if let Some(suffix) = file.sidecars.management_suffix {
            self.management_suffix = suffix;
        }
        if let Some(suffix) = file.sidecars.note_suffix {
            self.note_suffix = suffix;
        }

        Ok(self)
    }

    /// Check both suffixes produce a sibling name rather than a different path
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_suffix("management_suffix", &self.management_suffix)?;
        validate_suffix("note_suffix", &self.note_suffix)?;
        Ok(())
    }
}

fn validate_suffix(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let valid = value.len() > 1
        && value.starts_with('.')
        && !value.contains(std::path::is_separator);

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidSuffix {
            key,
            value: value.to_string(),
        })
    }
}

/// Load the embedded rules, then apply an optional user override file
pub fn load_config(override_path: Option<&Path>) -> Result<ReclaimConfig> {
    let mut config = ReclaimConfig::embedded()?;

    if let Some(path) = override_path {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        config = config
            .merge_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
    }

    config.validate()?;
    Ok(config)
}
