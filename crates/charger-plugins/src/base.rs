//! Module plugin trait, the host context handed to it, and state persistence

use crate::menu::MenuBar;
use charger_core::{KeyStroke, ModuleError, PluginDescriptor, PluginError};
use charger_store::Paths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Load a module's persisted state, or the default when nothing was saved yet
pub fn load_state<T>(paths: &Paths, module_id: &str) -> charger_core::Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let state_path = paths.state_file(module_id);
    if !state_path.exists() {
        return Ok(T::default());
    }

    let contents = std::fs::read_to_string(&state_path)?;
    let state: T = serde_json::from_str(&contents)?;
    Ok(state)
}

/// Persist a module's state atomically
pub fn save_state<T>(paths: &Paths, module_id: &str, state: &T) -> charger_core::Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string_pretty(state)?;
    charger_store::atomic_write(&paths.state_file(module_id), json.as_bytes())?;
    Ok(())
}

/// What a module sees of the host while it starts up or shuts down
pub struct HostContext<'a> {
    module_id: &'a str,
    menu: &'a mut MenuBar,
    paths: &'a Paths,
}

impl<'a> HostContext<'a> {
    pub fn new(module_id: &'a str, menu: &'a mut MenuBar, paths: &'a Paths) -> Self {
        Self {
            module_id,
            menu,
            paths,
        }
    }

    /// Registry id of the module being driven
    pub fn module_id(&self) -> &str {
        self.module_id
    }

    pub fn menu(&self) -> &MenuBar {
        &*self.menu
    }

    pub fn menu_mut(&mut self) -> &mut MenuBar {
        &mut *self.menu
    }

    /// Private directory for the module's own files (not created)
    pub fn data_dir(&self) -> PathBuf {
        self.paths.module_data_dir(self.module_id)
    }

    pub fn load_state<T>(&self) -> Result<T, ModuleError>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        load_state(self.paths, self.module_id)
            .map_err(|e| ModuleError::with_source("cannot load module state", e))
    }

    pub fn save_state<T: Serialize>(&self, state: &T) -> Result<(), ModuleError> {
        save_state(self.paths, self.module_id, state)
            .map_err(|e| ModuleError::with_source("cannot save module state", e))
    }
}

/// Contract every module must implement to appear on the host's tools menu
///
/// The host reads `name`, `key_stroke` and `info` once, before `startup`,
/// and builds the menu entry from them. `startup` is called when the user
/// selects the entry; `shutdown` when the module is deactivated or the host
/// closes. Each instance sees at most one `startup`/`shutdown` pair; the host
/// rejects anything else before it reaches the module.
pub trait ModulePlugin: Send {
    /// Display name, used as the menu label
    fn name(&self) -> &str;

    /// Menu accelerator; `None` means no shortcut
    fn key_stroke(&self) -> Option<KeyStroke> {
        None
    }

    /// Purpose, copyright, version and the like
    fn info(&self) -> &str {
        ""
    }

    /// Attach the module to the host
    fn startup(&mut self, ctx: &mut HostContext<'_>) -> Result<(), ModuleError>;

    /// Release whatever `startup` acquired
    fn shutdown(&mut self, ctx: &mut HostContext<'_>) -> Result<(), ModuleError>;
}

/// Snapshot a module's descriptor, rejecting unusable ones
///
/// The accelerator is stored in the form a typed shortcut parses to, so a
/// module reporting `ctrl k` is matched by pressing "ctrl k".
pub fn read_descriptor(
    module_id: &str,
    plugin: &dyn ModulePlugin,
) -> charger_core::Result<PluginDescriptor> {
    let accelerator = plugin
        .key_stroke()
        .map(KeyStroke::normalized)
        .transpose()
        .map_err(|err| PluginError::InvalidDescriptor {
            module: module_id.to_string(),
            reason: err.to_string(),
        })?;

    let descriptor = PluginDescriptor::new(
        module_id,
        plugin.name().trim(),
        accelerator,
        plugin.info(),
    );

    match descriptor.validate() {
        Some(reason) => Err(PluginError::InvalidDescriptor {
            module: module_id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(descriptor),
    }
}
