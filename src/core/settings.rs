// src/core/settings.rs

use crate::{
    constants::{
        DEFAULT_CLASSPATH_FLAG, DEFAULT_HEAP_FLAG, DEFAULT_HOME_VARIABLE, DEFAULT_RUNTIME,
        ENVIRONMENTS_DIR,
    },
    core::paths::{self, PathError},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    #[error("Failed to parse settings.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// User-level settings read from `settings.toml` in the config directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where environments live. Defaults to `<config>/envs`.
    pub environments_dir: Option<String>,
    pub default_runtime: String,
    pub heap_flag: String,
    pub classpath_flag: String,
    /// Variable exported to children, pointing at the environment directory.
    pub home_variable: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environments_dir: None,
            default_runtime: DEFAULT_RUNTIME.to_string(),
            heap_flag: DEFAULT_HEAP_FLAG.to_string(),
            classpath_flag: DEFAULT_CLASSPATH_FLAG.to_string(),
            home_variable: DEFAULT_HOME_VARIABLE.to_string(),
        }
    }
}

impl Settings {
    /// Resolves the environments root against the given config directory.
    pub fn environments_root(&self, config_dir: &Path) -> Result<PathBuf, SettingsError> {
        match &self.environments_dir {
            Some(template) if !template.trim().is_empty() => {
                Ok(paths::expand_user_path(template.trim())?)
            }
            _ => Ok(config_dir.join(ENVIRONMENTS_DIR)),
        }
    }
}

/// Loads `settings.toml`, writing a default one on first use.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let settings_path = paths::get_settings_path()?;
    load_settings_from(&settings_path)
}

/// Loads settings from an explicit path, writing defaults if the file is missing.
pub fn load_settings_from(settings_path: &Path) -> Result<Settings, SettingsError> {
    if !settings_path.exists() {
        let default_settings = Settings::default();
        let toml_string = toml::to_string_pretty(&default_settings)?;
        fs::write(settings_path, toml_string)?;
        log::debug!("Wrote default settings to '{}'", settings_path.display());
        Ok(default_settings)
    } else {
        let content = fs::read_to_string(settings_path)?;
        Ok(toml::from_str(&content)?)
    }
}
