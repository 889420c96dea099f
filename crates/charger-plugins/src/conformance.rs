//! Conformance checks any module implementation should pass
//!
//! Each check runs a fresh instance against a scratch menu bar: descriptor
//! sanity before and after `startup`, one full `startup`/`shutdown` cycle,
//! and that `shutdown` undoes every menu change `startup` made.

use crate::base::{HostContext, ModulePlugin};
use crate::menu::{Menu, MenuBar, TOOLS_MENU};
use crate::registry::PluginRegistry;
use charger_core::{KeyStroke, ModuleError};
use charger_store::Paths;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceReport {
    pub module: String,
    pub violations: Vec<String>,
}

impl ConformanceReport {
    pub fn is_conforming(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_conforming() {
            return write!(f, "{}: ok", self.module);
        }
        writeln!(f, "{}: {} violation(s)", self.module, self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

struct Snapshot {
    name: String,
    stroke: Option<KeyStroke>,
    info: String,
}

impl Snapshot {
    fn of(plugin: &dyn ModulePlugin) -> Self {
        Self {
            name: plugin.name().to_string(),
            stroke: plugin.key_stroke(),
            info: plugin.info().to_string(),
        }
    }
}

/// Check every registered module
pub fn check_registry(registry: &PluginRegistry, paths: &Paths) -> Vec<ConformanceReport> {
    registry
        .ids()
        .map(|id| check_registered(registry, id, paths))
        .collect()
}

/// Check one registered module, building a fresh instance for it
pub fn check_registered(registry: &PluginRegistry, id: &str, paths: &Paths) -> ConformanceReport {
    match catch_unwind(AssertUnwindSafe(|| registry.instantiate(id))) {
        Ok(Ok(plugin)) => check(id, plugin, paths),
        Ok(Err(err)) => ConformanceReport {
            module: id.to_string(),
            violations: vec![err.to_string()],
        },
        Err(_) => ConformanceReport {
            module: id.to_string(),
            violations: vec!["factory panicked".to_string()],
        },
    }
}

/// Run the checks against `plugin`
pub fn check(id: &str, mut plugin: Box<dyn ModulePlugin>, paths: &Paths) -> ConformanceReport {
    let mut violations = Vec::new();

    let before = Snapshot::of(plugin.as_ref());
    if before.name.trim().is_empty() {
        violations.push("name is empty before startup".to_string());
    }
    if let Some(stroke) = before.stroke {
        if stroke.to_string().parse::<KeyStroke>() != Ok(stroke) {
            violations.push(format!("key stroke `{}` does not describe itself", stroke));
        }
    }

    let mut menu = MenuBar::with_menu(Menu::new(TOOLS_MENU));
    let pristine = menu.clone();

    if let Err(message) = run(id, plugin.as_mut(), &mut menu, paths, |p, ctx| p.startup(ctx)) {
        violations.push(format!("startup failed: {}", message));
        return ConformanceReport {
            module: id.to_string(),
            violations,
        };
    }

    let after = Snapshot::of(plugin.as_ref());
    if after.name.trim().is_empty() {
        violations.push("name is empty after startup".to_string());
    }
    if after.name != before.name {
        violations.push(format!(
            "name changed after startup: `{}` -> `{}`",
            before.name, after.name
        ));
    }
    if after.stroke != before.stroke {
        violations.push("key stroke changed after startup".to_string());
    }
    if after.info != before.info {
        violations.push("info changed after startup".to_string());
    }

    if let Err(message) = run(id, plugin.as_mut(), &mut menu, paths, |p, ctx| p.shutdown(ctx)) {
        violations.push(format!("shutdown failed: {}", message));
    } else if menu != pristine {
        violations.push("shutdown left menu changes behind".to_string());
    }

    ConformanceReport {
        module: id.to_string(),
        violations,
    }
}

fn run<F>(
    id: &str,
    plugin: &mut dyn ModulePlugin,
    menu: &mut MenuBar,
    paths: &Paths,
    call: F,
) -> Result<(), String>
where
    F: FnOnce(&mut dyn ModulePlugin, &mut HostContext<'_>) -> Result<(), ModuleError>,
{
    let mut ctx = HostContext::new(id, menu, paths);
    match catch_unwind(AssertUnwindSafe(|| call(plugin, &mut ctx))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.describe()),
        Err(_) => Err("panicked".to_string()),
    }
}
