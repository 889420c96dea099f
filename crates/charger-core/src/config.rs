//! Host plugin configuration (`plugins/config.json`)

use crate::error::{PluginError, Result};
use crate::keystroke::KeyStroke;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// What discovery does when two modules report the same display name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the first, reject later ones with `PluginError::DuplicateName`
    #[default]
    Reject,
    /// Load both; menu entries share the label
    Allow,
}

/// Per-module accelerator override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AcceleratorSetting {
    /// Drop the module's own shortcut
    Disabled,
    Stroke(KeyStroke),
}

impl TryFrom<String> for AcceleratorSetting {
    type Error = crate::keystroke::KeyStrokeError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("none") {
            Ok(AcceleratorSetting::Disabled)
        } else {
            value.parse().map(AcceleratorSetting::Stroke)
        }
    }
}

impl From<AcceleratorSetting> for String {
    fn from(setting: AcceleratorSetting) -> String {
        setting.to_string()
    }
}

impl fmt::Display for AcceleratorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceleratorSetting::Disabled => f.write_str("none"),
            AcceleratorSetting::Stroke(stroke) => write!(f, "{}", stroke),
        }
    }
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Module id -> enabled; absent ids are enabled
    pub enabled: BTreeMap<String, bool>,
    pub duplicate_names: DuplicatePolicy,
    /// Module id -> accelerator override
    pub accelerators: BTreeMap<String, AcceleratorSetting>,
    /// Append lifecycle events to the journal file
    pub journal: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            enabled: BTreeMap::new(),
            duplicate_names: DuplicatePolicy::Reject,
            accelerators: BTreeMap::new(),
            journal: true,
        }
    }
}

impl HostConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no host config, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| PluginError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Persist atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        charger_store::atomic_write(path, json.as_bytes())?;
        Ok(())
    }

    pub fn is_enabled(&self, module_id: &str) -> bool {
        self.enabled.get(module_id).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, module_id: &str, enabled: bool) {
        self.enabled.insert(module_id.to_string(), enabled);
    }

    /// Effective accelerator for a module given the one it provides
    pub fn accelerator_for(
        &self,
        module_id: &str,
        provided: Option<KeyStroke>,
    ) -> Option<KeyStroke> {
        match self.accelerators.get(module_id) {
            Some(AcceleratorSetting::Disabled) => None,
            Some(AcceleratorSetting::Stroke(stroke)) => Some(*stroke),
            None => provided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystroke::{Key, Modifiers};

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert!(config.is_enabled("anything"));
        assert_eq!(config.duplicate_names, DuplicatePolicy::Reject);
        assert!(config.journal);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = HostConfig::load(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "enabled": { "demo": false },
                "duplicate_names": "allow",
                "accelerators": { "demo": "ctrl shift D", "log": "none" },
                "journal": false
            }"#,
        )
        .unwrap();

        let config = HostConfig::load(&path).unwrap();
        assert!(!config.is_enabled("demo"));
        assert!(config.is_enabled("log"));
        assert_eq!(config.duplicate_names, DuplicatePolicy::Allow);
        assert!(!config.journal);

        let provided = Some(KeyStroke::plain(Key::Function(2)));
        assert_eq!(
            config.accelerator_for("demo", None),
            Some(KeyStroke::new(Key::Char('D'), Modifiers::CTRL | Modifiers::SHIFT))
        );
        assert_eq!(config.accelerator_for("log", provided), None);
        assert_eq!(config.accelerator_for("other", provided), provided);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "enabled": { "demo": true } }"#).unwrap();

        let config = HostConfig::load(&path).unwrap();
        assert!(config.journal);
        assert_eq!(config.duplicate_names, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "accelerators": { "demo": "ctrl" } }"#).unwrap();

        let err = HostConfig::load(&path).unwrap_err();
        assert!(matches!(err, PluginError::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("plugins").join("config.json");

        let mut config = HostConfig::default();
        config.set_enabled("log", false);
        config
            .accelerators
            .insert("demo".to_string(), AcceleratorSetting::Disabled);
        config.save(&path).unwrap();

        let reloaded = HostConfig::load(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
