use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default document endpoint for the hosted JSON store
pub const DEFAULT_SYNC_URL: &str = "https://api.jsonstorage.net/v1/json";

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote mirroring settings; tasks stay local unless these are set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Default: see src/templates/config.toml
    #[serde(default)]
    pub enabled: bool,
    /// Document key appended to the endpoint path
    #[serde(default)]
    pub api_key: String,
    /// Write credential appended as a query parameter on updates, if set
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_sync_url")]
    pub url: String,
    /// Default: see src/templates/config.toml
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            enabled: false,
            api_key: String::new(),
            secret: String::new(),
            url: default_sync_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SyncConfig {
    /// Mirroring needs both the switch and a document key
    pub fn mirroring_enabled(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

/// Default: see src/templates/config.toml
fn default_sync_url() -> String {
    DEFAULT_SYNC_URL.to_string()
}

/// Default: see src/templates/config.toml
fn default_timeout_secs() -> u64 {
    5
}

/// Default: see src/templates/config.toml
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_local_only() {
        let config = Config::default();
        assert!(!config.sync.enabled);
        assert!(!config.sync.mirroring_enabled());
        assert_eq!(config.sync.url, DEFAULT_SYNC_URL);
        assert_eq!(config.sync.timeout_secs, 5);
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn parses_minimal_toml() {
        let config: Config = toml::from_str(
            r#"
            [sync]
            enabled = true
            api_key = "doc-key"
            "#,
        )
        .unwrap();
        assert!(config.sync.mirroring_enabled());
        assert_eq!(config.sync.api_key, "doc-key");
        assert_eq!(config.sync.url, DEFAULT_SYNC_URL);
    }

    #[test]
    fn enabled_without_key_stays_local() {
        let config: Config = toml::from_str("[sync]\nenabled = true\n").unwrap();
        assert!(config.sync.enabled);
        assert!(!config.sync.mirroring_enabled());
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.sync.enabled);
        assert!(config.ui.colors.is_empty());
    }
}
