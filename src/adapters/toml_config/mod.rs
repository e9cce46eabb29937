// TOML config adapter - Settings from TOML files and environment variables

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::*;

/// Files searched, in order, when no config file is named explicitly
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["tubize.toml", "config/tubize.toml"];

pub const ENV_SCENE_DETECTION: &str = "TUBIZE_SCENE_DETECTION";
pub const ENV_PREVIEW_WIDTH: &str = "TUBIZE_PREVIEW_WIDTH";
pub const ENV_FORCE: &str = "TUBIZE_FORCE";
pub const ENV_LOG_LEVEL: &str = "TUBIZE_LOG_LEVEL";

/// One layer of settings; unset fields fall through to the next layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsLayer {
    pub scene_detection: Option<i32>,
    pub preview_width: Option<u32>,
    pub force: Option<bool>,
    pub log_level: Option<String>,
}

impl SettingsLayer {
    /// Fill the fields left unset in `self` from `lower`
    pub fn over(self, lower: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            scene_detection: self.scene_detection.or(lower.scene_detection),
            preview_width: self.preview_width.or(lower.preview_width),
            force: self.force.or(lower.force),
            log_level: self.log_level.or(lower.log_level),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tubize: SettingsLayer,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse the `[tubize]` table of a TOML document
    pub fn parse(content: &str) -> Result<SettingsLayer, DomainError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.tubize)
    }

    pub fn load(path: &Path) -> Result<SettingsLayer, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::FsFail(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// First default config file found under `base_dir`
    pub fn discover(base_dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.is_file())
    }

    /// Settings from `TUBIZE_*` variables, read through `lookup`
    pub fn from_env<F>(lookup: F) -> Result<SettingsLayer, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layer = SettingsLayer {
            scene_detection: parse_var(&lookup, ENV_SCENE_DETECTION)?,
            preview_width: parse_var(&lookup, ENV_PREVIEW_WIDTH)?,
            force: lookup(ENV_FORCE).map(|value| parse_flag(ENV_FORCE, &value)).transpose()?,
            log_level: lookup(ENV_LOG_LEVEL),
        };
        if layer != SettingsLayer::default() {
            debug!("Environment overrides: {:?}", layer);
        }
        Ok(layer)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>, DomainError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| DomainError::BadArgs(format!("Invalid value for {}: '{}'", name, value)))
        })
        .transpose()
}

fn parse_flag(name: &str, value: &str) -> Result<bool, DomainError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DomainError::BadArgs(format!("Invalid value for {}: '{}'", name, value))),
    }
}
