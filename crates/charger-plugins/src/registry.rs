//! Explicit module registry: stable id -> factory

use crate::base::ModulePlugin;
use crate::demo::DemoPlugin;
use crate::sessionlog::SessionLogPlugin;
use charger_core::{PluginError, Result};

/// Builds a fresh module instance
pub type PluginFactory = Box<dyn Fn() -> Box<dyn ModulePlugin> + Send + Sync>;

struct RegistryEntry {
    id: String,
    factory: PluginFactory,
}

/// Ordered set of module factories the host discovers from
pub struct PluginRegistry {
    entries: Vec<RegistryEntry>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry holding the modules shipped with the host
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(DemoPlugin::ID, || Box::new(DemoPlugin::new()));
        registry.insert(SessionLogPlugin::ID, || Box::new(SessionLogPlugin::new()));
        registry
    }

    /// Register a factory under `id`
    ///
    /// Ids are non-empty and limited to ASCII letters, digits, `-` and `_`
    /// since they appear in file names and on the command line.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn ModulePlugin> + Send + Sync + 'static,
    {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(PluginError::InvalidDescriptor {
                module: id,
                reason: "id must be non-empty ASCII letters, digits, '-' or '_'".to_string(),
            });
        }
        if self.contains(&id) {
            return Err(PluginError::AlreadyRegistered(id));
        }

        self.insert(id, factory);
        Ok(())
    }

    fn insert<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ModulePlugin> + Send + Sync + 'static,
    {
        let id = id.into();
        tracing::debug!(module = %id, "registered module factory");
        self.entries.push(RegistryEntry {
            id,
            factory: Box::new(factory),
        });
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Build a fresh instance of `id`
    pub fn instantiate(&self, id: &str) -> Result<Box<dyn ModulePlugin>> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| (e.factory)())
            .ok_or_else(|| PluginError::UnknownModule(id.to_string()))
    }

    /// Get number of registered factories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
