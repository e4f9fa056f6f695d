//! Tool configuration.
//!
//! The config file is optional; when it is absent the defaults below apply.
//! `OFFICINA_DATA` and command-line flags override the data source in that
//! order.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current schema version for `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Store key holding the admin override document.
pub const DEFAULT_OVERRIDE_KEY: &str = "officinaplus_procedures_override_v1";
/// Default procedure document, relative to the working directory.
pub const DEFAULT_DATA_SOURCE: &str = "data/procedures.json";
/// Environment variable overriding `data_source`.
pub const DATA_SOURCE_ENV: &str = "OFFICINA_DATA";

const APP_DIR: &str = "officina";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,
    /// File path or `http(s)` URL of the default procedure document.
    pub data_source: String,
    pub override_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrator_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clipboard_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_opener: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

pub fn default_config() -> Config {
    Config {
        schema_version: CONFIG_SCHEMA_VERSION,
        data_source: DEFAULT_DATA_SOURCE.to_string(),
        override_key: DEFAULT_OVERRIDE_KEY.to_string(),
        store_dir: None,
        narrator_command: None,
        share_command: None,
        clipboard_command: None,
        print_opener: None,
        report_dir: None,
    }
}

/// `<config_dir>/officina/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config = serde_json::from_slice(&bytes).context("parse config JSON")?;
    Ok(config)
}

/// Load the config at `path`, falling back to defaults when the file is absent.
pub fn load_config_optional(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.is_file() => load_config(path),
        _ => Ok(default_config()),
    }
}

pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.data_source.trim().is_empty() {
        return Err(anyhow!("data_source must be non-empty"));
    }
    if config.override_key.trim().is_empty() {
        return Err(anyhow!("override_key must be non-empty"));
    }
    for (label, command) in [
        ("narrator_command", &config.narrator_command),
        ("share_command", &config.share_command),
        ("clipboard_command", &config.clipboard_command),
        ("print_opener", &config.print_opener),
    ] {
        if let Some(command) = command {
            let words = shell_words::split(command)
                .with_context(|| format!("parse {label}: {command}"))?;
            if words.is_empty() {
                return Err(anyhow!("{label} must name a program when set"));
            }
        }
    }
    Ok(())
}

impl Config {
    /// Replace the data source when an override is present and non-blank.
    pub fn override_data_source(&mut self, data_source: Option<&str>) {
        if let Some(source) = data_source.map(str::trim).filter(|s| !s.is_empty()) {
            self.data_source = source.to_string();
        }
    }

    /// Directory of the persistent override store.
    ///
    /// Defaults to `~/.local/share/officina` (or the platform equivalent).
    pub fn resolve_store_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.store_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow!("cannot determine home directory"))?;
        Ok(data_dir.join(APP_DIR))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
