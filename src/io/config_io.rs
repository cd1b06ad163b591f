use std::fs;
use std::io;
use std::path::PathBuf;

use crate::io::local::atomic_write;
use crate::io::paths::DataPaths;
use crate::model::Config;

/// Commented starting point written the first time the config is edited
const CONFIG_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Environment override for sync.enabled ("true"/"1" turn it on)
pub const REMOTE_ENV: &str = "PLANK_REMOTE";
/// Environment override for sync.api_key
pub const API_KEY_ENV: &str = "PLANK_API_KEY";

/// Error type for config reads and edits
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// Load config.toml with environment overrides applied. A missing file
/// is an ordinary local-only setup, not an error.
pub fn load_config(paths: &DataPaths) -> Result<Config, ConfigError> {
    let mut config = load_config_file(paths)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Load config.toml as written, without environment overrides
pub fn load_config_file(paths: &DataPaths) -> Result<Config, ConfigError> {
    let path = paths.config_file();
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Apply $PLANK_REMOTE and $PLANK_API_KEY on top of the file
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(
        config,
        std::env::var(REMOTE_ENV).ok().as_deref(),
        std::env::var(API_KEY_ENV).ok().as_deref(),
    );
}

fn apply_overrides(config: &mut Config, remote: Option<&str>, api_key: Option<&str>) {
    if let Some(value) = remote {
        config.sync.enabled = value == "true" || value == "1";
    }
    if let Some(key) = api_key
        && !key.is_empty()
    {
        config.sync.api_key = key.to_string();
    }
}

/// Read config.toml for round-trip-safe editing, returning both the
/// parsed config and the raw toml_edit document. A missing file starts
/// from the commented template.
pub fn read_config_doc(
    paths: &DataPaths,
) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = paths.config_file();
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?
    } else {
        CONFIG_TEMPLATE.to_string()
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back, preserving formatting and comments
pub fn write_config_doc(
    paths: &DataPaths,
    doc: &toml_edit::DocumentMut,
) -> Result<(), ConfigError> {
    paths.ensure_root().map_err(|e| ConfigError::WriteError {
        path: paths.root().to_path_buf(),
        source: e,
    })?;
    let path = paths.config_file();
    atomic_write(&path, doc.to_string().as_bytes())
        .map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Flip the sync.enabled switch in the config document
pub fn set_sync_enabled(doc: &mut toml_edit::DocumentMut, enabled: bool) {
    ensure_sync_table(doc);
    doc["sync"]["enabled"] = toml_edit::value(enabled);
}

/// Store the document key in the config document
pub fn set_api_key(doc: &mut toml_edit::DocumentMut, api_key: &str) {
    ensure_sync_table(doc);
    doc["sync"]["api_key"] = toml_edit::value(api_key);
}

/// Store the update secret in the config document
pub fn set_secret(doc: &mut toml_edit::DocumentMut, secret: &str) {
    ensure_sync_table(doc);
    doc["sync"]["secret"] = toml_edit::value(secret);
}

fn ensure_sync_table(doc: &mut toml_edit::DocumentMut) {
    if !doc.contains_key("sync") {
        doc["sync"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
}
