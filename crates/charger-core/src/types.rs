//! Descriptor snapshot taken by the host when a module is discovered

use crate::keystroke::KeyStroke;
use serde::{Deserialize, Serialize};

/// Identifying data of a module, read once before activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Registry id (stable, used in config and on the command line)
    pub id: String,
    /// Display name, used as the menu label
    pub name: String,
    /// Menu shortcut, `None` when the module wants none
    pub accelerator: Option<KeyStroke>,
    /// Free-form purpose / copyright / version text
    pub info: String,
}

impl PluginDescriptor {
    pub fn new(id: &str, name: &str, accelerator: Option<KeyStroke>, info: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            accelerator,
            info: info.to_string(),
        }
    }

    /// Returns the reason the descriptor cannot be used, if any
    pub fn validate(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name must not be empty")
        } else if self.name.contains(['\n', '\r']) {
            Some("name must be a single line")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystroke::{Key, Modifiers};

    #[test]
    fn test_validate() {
        assert_eq!(PluginDescriptor::new("demo", "Demo", None, "").validate(), None);
        assert!(PluginDescriptor::new("demo", "   ", None, "").validate().is_some());
        assert!(PluginDescriptor::new("demo", "A\nB", None, "").validate().is_some());
    }

    #[test]
    fn test_descriptor_json() {
        let desc = PluginDescriptor::new(
            "log",
            "Session Log",
            Some(KeyStroke::new(Key::Char('L'), Modifiers::CTRL | Modifiers::SHIFT)),
            "counts activations",
        );
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["accelerator"], "ctrl shift L");

        let none = PluginDescriptor::new("demo", "Demo", None, "test module");
        let json = serde_json::to_value(&none).unwrap();
        assert!(json["accelerator"].is_null());
    }
}
