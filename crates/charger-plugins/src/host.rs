//! Module host: discovery, tools menu, validated lifecycle and journal

use crate::base::{read_descriptor, HostContext, ModulePlugin};
use crate::menu::{Menu, MenuAction, MenuBar, MenuItem, TOOLS_MENU};
use crate::registry::PluginRegistry;
use charger_core::{
    DuplicatePolicy, HostConfig, KeyStroke, LifecycleEvent, LifecycleOp, LifecycleState,
    ModuleError, PluginDescriptor, PluginError, Result,
};
use charger_store::Paths;
use std::panic::{catch_unwind, AssertUnwindSafe};

struct LoadedModule {
    descriptor: PluginDescriptor,
    state: LifecycleState,
    instance: Box<dyn ModulePlugin>,
}

/// Outcome of `PluginHost::discover`
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Ids instantiated and added to the tools menu, in order
    pub loaded: Vec<String>,
    /// Ids skipped because the config disables them
    pub disabled: Vec<String>,
    /// Modules that could not be loaded
    pub rejected: Vec<PluginError>,
}

/// Result of activating a menu item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The module with this id was started
    Started(String),
    /// A module-defined command for the embedder to run
    Command(String),
}

/// Owns every loaded module and drives its lifecycle
///
/// All operations take `&mut self`: a module never sees concurrent or
/// re-entrant `startup`/`shutdown` calls.
pub struct PluginHost {
    registry: PluginRegistry,
    config: HostConfig,
    paths: Paths,
    modules: Vec<LoadedModule>,
    menu_bar: MenuBar,
    start_order: Vec<String>,
    journal: Vec<LifecycleEvent>,
}

impl PluginHost {
    /// Instantiate one module per enabled registry entry and build the tools menu
    pub fn discover(
        registry: PluginRegistry,
        config: HostConfig,
        paths: Paths,
    ) -> (Self, DiscoveryReport) {
        let mut host = Self {
            registry,
            config,
            paths,
            modules: Vec::new(),
            menu_bar: MenuBar::new(),
            start_order: Vec::new(),
            journal: Vec::new(),
        };
        let mut report = DiscoveryReport::default();

        let ids: Vec<String> = host.registry.ids().map(str::to_string).collect();
        for id in ids {
            if !host.config.is_enabled(&id) {
                tracing::info!(module = %id, "module disabled in config");
                report.disabled.push(id);
                continue;
            }

            match host.admit(&id) {
                Ok(()) => {
                    tracing::info!(module = %id, "module discovered");
                    report.loaded.push(id);
                }
                Err(err) => {
                    tracing::warn!(module = %id, %err, "module rejected");
                    report.rejected.push(err);
                }
            }
        }

        host.build_tools_menu();
        (host, report)
    }

    fn admit(&mut self, id: &str) -> Result<()> {
        let instance = self.instantiate(id)?;
        let mut descriptor = read_descriptor(id, instance.as_ref())?;
        descriptor.accelerator = self.config.accelerator_for(id, descriptor.accelerator);

        if self.config.duplicate_names == DuplicatePolicy::Reject {
            if let Some(existing) = self
                .modules
                .iter()
                .find(|m| m.descriptor.name == descriptor.name)
            {
                return Err(PluginError::DuplicateName {
                    name: descriptor.name,
                    existing: existing.descriptor.id.clone(),
                    rejected: id.to_string(),
                });
            }
        }

        self.modules.push(LoadedModule {
            descriptor,
            state: LifecycleState::Discovered,
            instance,
        });
        Ok(())
    }

    fn instantiate(&self, id: &str) -> Result<Box<dyn ModulePlugin>> {
        let registry = &self.registry;
        catch_unwind(AssertUnwindSafe(|| registry.instantiate(id))).unwrap_or_else(|panic| {
            Err(PluginError::InitializationFailed {
                module: id.to_string(),
                message: format!("factory panicked: {}", panic_message(panic.as_ref())),
            })
        })
    }

    /// One Tools entry per module; the first module to claim a shortcut keeps it
    fn build_tools_menu(&mut self) {
        let mut tools = Menu::new(TOOLS_MENU);
        let mut bound: Vec<(KeyStroke, &str)> = Vec::new();

        for module in &self.modules {
            let desc = &module.descriptor;
            let accelerator = match desc.accelerator {
                Some(stroke) => match bound.iter().find(|(s, _)| *s == stroke) {
                    Some((_, owner)) => {
                        tracing::warn!(
                            module = %desc.id,
                            shortcut = %stroke,
                            owner = %owner,
                            "shortcut already taken, menu entry gets none"
                        );
                        None
                    }
                    None => {
                        bound.push((stroke, desc.id.as_str()));
                        Some(stroke)
                    }
                },
                None => None,
            };

            tools.items.push(
                MenuItem::new(desc.name.clone(), MenuAction::StartModule(desc.id.clone()))
                    .with_accelerator(accelerator),
            );
        }

        self.menu_bar = MenuBar::with_menu(tools);
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.modules
            .iter()
            .position(|m| m.descriptor.id == id)
            .ok_or_else(|| PluginError::UnknownModule(id.to_string()))
    }

    fn check_transition(&self, idx: usize, op: LifecycleOp) -> Result<LifecycleState> {
        let module = &self.modules[idx];
        module.state.transition(op).ok_or_else(|| {
            let err = PluginError::InvalidTransition {
                module: module.descriptor.id.clone(),
                from: module.state,
                op,
            };
            tracing::warn!(%err, "lifecycle call rejected");
            err
        })
    }

    /// Start a discovered module
    pub fn start(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let next = self.check_transition(idx, LifecycleOp::Startup)?;

        let outcome = self.invoke(idx, |plugin, ctx| plugin.startup(ctx));
        match outcome {
            Ok(()) => {
                self.set_state(idx, LifecycleOp::Startup, next, None);
                self.start_order.push(id.to_string());
                tracing::info!(module = %id, "module started");
                Ok(())
            }
            Err(message) => {
                self.set_state(
                    idx,
                    LifecycleOp::Startup,
                    LifecycleState::Failed,
                    Some(message.clone()),
                );
                tracing::error!(module = %id, error = %message, "module failed to start");
                Err(PluginError::InitializationFailed {
                    module: id.to_string(),
                    message,
                })
            }
        }
    }

    /// Stop a running module
    pub fn stop(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let next = self.check_transition(idx, LifecycleOp::Shutdown)?;

        let outcome = self.invoke(idx, |plugin, ctx| plugin.shutdown(ctx));
        self.start_order.retain(|started| started != id);
        match outcome {
            Ok(()) => {
                self.set_state(idx, LifecycleOp::Shutdown, next, None);
                tracing::info!(module = %id, "module stopped");
                Ok(())
            }
            Err(message) => {
                self.set_state(
                    idx,
                    LifecycleOp::Shutdown,
                    LifecycleState::Failed,
                    Some(message.clone()),
                );
                tracing::error!(module = %id, error = %message, "module failed to shut down");
                Err(PluginError::ShutdownFailed {
                    module: id.to_string(),
                    message,
                })
            }
        }
    }

    /// Run a lifecycle call, turning module errors and panics into a message
    fn invoke<F>(&mut self, idx: usize, call: F) -> std::result::Result<(), String>
    where
        F: FnOnce(
            &mut dyn ModulePlugin,
            &mut HostContext<'_>,
        ) -> std::result::Result<(), ModuleError>,
    {
        let module = &mut self.modules[idx];
        let mut ctx = HostContext::new(&module.descriptor.id, &mut self.menu_bar, &self.paths);
        let instance = module.instance.as_mut();

        match catch_unwind(AssertUnwindSafe(|| call(instance, &mut ctx))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.describe()),
            Err(panic) => Err(format!("panicked: {}", panic_message(panic.as_ref()))),
        }
    }

    fn set_state(
        &mut self,
        idx: usize,
        op: LifecycleOp,
        to: LifecycleState,
        error: Option<String>,
    ) {
        let module = &mut self.modules[idx];
        let mut event = LifecycleEvent::new(&module.descriptor.id, op, module.state, to);
        if let Some(error) = error {
            event = event.with_error(error);
        }
        module.state = to;
        self.record(event);
    }

    fn record(&mut self, event: LifecycleEvent) {
        if self.config.journal {
            if let Err(err) = charger_store::append_jsonl(&self.paths.journal_file(), &event) {
                tracing::warn!(%err, "cannot append to lifecycle journal");
            }
        }
        self.journal.push(event);
    }

    /// Dispatch a menu action: start the module or hand back its command
    ///
    /// A stopped or failed module is reloaded before it is started again.
    pub fn activate(&mut self, action: &MenuAction) -> Result<Activation> {
        match action {
            MenuAction::Command(command) => Ok(Activation::Command(command.clone())),
            MenuAction::StartModule(id) => {
                if self.state(id).is_some_and(LifecycleState::is_terminal) {
                    self.reload(id)?;
                }
                self.start(id)?;
                Ok(Activation::Started(id.clone()))
            }
        }
    }

    /// Activate whatever item `stroke` is bound to; `None` if it is unbound
    pub fn activate_shortcut(&mut self, stroke: &KeyStroke) -> Result<Option<Activation>> {
        let action = match self.menu_bar.find_accelerator(stroke) {
            Some(item) => item.action.clone(),
            None => return Ok(None),
        };
        self.activate(&action).map(Some)
    }

    /// Replace a non-running module's instance with a fresh one from its factory
    ///
    /// The menu entry built at discovery is kept, so the new instance must
    /// report the same name.
    pub fn reload(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let next = self.check_transition(idx, LifecycleOp::Reload)?;

        let instance = self.instantiate(id)?;
        let fresh = read_descriptor(id, instance.as_ref())?;
        let current = &self.modules[idx].descriptor;
        if fresh.name != current.name {
            return Err(PluginError::InvalidDescriptor {
                module: id.to_string(),
                reason: format!(
                    "reloaded instance is named `{}`, expected `{}`",
                    fresh.name, current.name
                ),
            });
        }

        self.modules[idx].instance = instance;
        self.set_state(idx, LifecycleOp::Reload, next, None);
        tracing::info!(module = %id, "module reloaded");
        Ok(())
    }

    /// Stop the module if running, then drop it and its tools entry
    ///
    /// The module is removed even when its shutdown fails; the failure is returned.
    pub fn unload(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let stopped = if self.modules[idx].state.is_running() {
            self.stop(id)
        } else {
            Ok(())
        };

        self.modules.remove(idx);
        self.menu_bar
            .remove_action(&MenuAction::StartModule(id.to_string()));
        tracing::info!(module = %id, "module unloaded");
        stopped
    }

    /// Stop every running module, most recently started first
    ///
    /// Keeps going past failures and returns all of them.
    pub fn shutdown_all(&mut self) -> Vec<PluginError> {
        let running: Vec<String> = self.start_order.iter().rev().cloned().collect();
        running
            .iter()
            .filter_map(|id| self.stop(id).err())
            .collect()
    }

    pub fn state(&self, id: &str) -> Option<LifecycleState> {
        self.modules
            .iter()
            .find(|m| m.descriptor.id == id)
            .map(|m| m.state)
    }

    pub fn descriptor(&self, id: &str) -> Option<&PluginDescriptor> {
        self.modules
            .iter()
            .find(|m| m.descriptor.id == id)
            .map(|m| &m.descriptor)
    }

    /// Descriptors of every loaded module, in discovery order
    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.modules.iter().map(|m| &m.descriptor)
    }

    /// Ids of running modules in start order
    pub fn running(&self) -> &[String] {
        &self.start_order
    }

    pub fn menu_bar(&self) -> &MenuBar {
        &self.menu_bar
    }

    /// Events recorded by this host since discovery
    pub fn journal(&self) -> &[LifecycleEvent] {
        &self.journal
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
