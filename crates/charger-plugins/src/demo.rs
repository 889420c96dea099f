//! Demo module: adds its own top-level menu while running

use crate::base::{HostContext, ModulePlugin};
use crate::menu::{Menu, MenuItem};
use charger_core::ModuleError;

pub const DEMO_MENU: &str = "Demo";

pub struct DemoPlugin {
    running: bool,
}

impl DemoPlugin {
    pub const ID: &'static str = "demo";

    pub fn new() -> Self {
        Self { running: false }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for DemoPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulePlugin for DemoPlugin {
    fn name(&self) -> &str {
        "Demo"
    }

    fn info(&self) -> &str {
        "test module"
    }

    fn startup(&mut self, ctx: &mut HostContext<'_>) -> Result<(), ModuleError> {
        let menu = Menu::new(DEMO_MENU)
            .with_item(MenuItem::command("Say Hello", "demo.hello"))
            .with_item(MenuItem::command("About Demo", "demo.about"));
        ctx.menu_mut().add_menu(menu)?;
        self.running = true;
        tracing::debug!(module = ctx.module_id(), "demo menu attached");
        Ok(())
    }

    fn shutdown(&mut self, ctx: &mut HostContext<'_>) -> Result<(), ModuleError> {
        self.running = false;
        ctx.menu_mut()
            .remove_menu(DEMO_MENU)
            .map(|_| ())
            .ok_or_else(|| ModuleError::new("demo menu was already removed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuBar;
    use charger_store::Paths;

    #[test]
    fn test_demo_descriptor() {
        let plugin = DemoPlugin::new();
        assert_eq!(plugin.name(), "Demo");
        assert_eq!(plugin.key_stroke(), None);
        assert_eq!(plugin.info(), "test module");
        assert!(!plugin.is_running());
    }

    #[test]
    fn test_demo_menu_attached_and_removed() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp.path());
        let mut menu = MenuBar::new();
        let mut plugin = DemoPlugin::new();

        {
            let mut ctx = HostContext::new(DemoPlugin::ID, &mut menu, &paths);
            plugin.startup(&mut ctx).unwrap();
        }
        assert!(plugin.is_running());
        assert_eq!(menu.menu(DEMO_MENU).unwrap().items.len(), 2);

        {
            let mut ctx = HostContext::new(DemoPlugin::ID, &mut menu, &paths);
            plugin.shutdown(&mut ctx).unwrap();
            assert!(plugin.shutdown(&mut ctx).is_err());
        }
        assert!(menu.menu(DEMO_MENU).is_none());
    }
}
