//! Menu model the host exposes to modules

use charger_core::{KeyStroke, ModuleError};
use std::fmt;

/// Label of the menu the host fills with one entry per module
pub const TOOLS_MENU: &str = "Tools";

/// What selecting a menu item does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Activate the module with this registry id
    StartModule(String),
    /// Module-defined command, dispatched by whoever embeds the host
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub accelerator: Option<KeyStroke>,
    pub action: MenuAction,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            accelerator: None,
            action,
        }
    }

    pub fn command(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(label, MenuAction::Command(command.into()))
    }

    pub fn with_accelerator(mut self, accelerator: Option<KeyStroke>) -> Self {
        self.accelerator = accelerator;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub label: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn item(&self, label: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.label == label)
    }
}

/// Top-level menus, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuBar {
    menus: Vec<Menu>,
}

impl MenuBar {
    pub fn new() -> Self {
        Self { menus: Vec::new() }
    }

    /// Bar holding just `menu`, taken as is
    pub(crate) fn with_menu(menu: Menu) -> Self {
        Self { menus: vec![menu] }
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn menu(&self, label: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.label == label)
    }

    fn menu_mut(&mut self, label: &str) -> Option<&mut Menu> {
        self.menus.iter_mut().find(|m| m.label == label)
    }

    /// Append a top-level menu; labels are unique and item shortcuts must be free
    pub fn add_menu(&mut self, menu: Menu) -> Result<(), ModuleError> {
        if self.menu(&menu.label).is_some() {
            return Err(ModuleError::new(format!(
                "menu `{}` already exists",
                menu.label
            )));
        }
        let mut seen: Vec<&MenuItem> = Vec::new();
        for item in &menu.items {
            self.check_accelerator_free(item)?;
            if let Some(stroke) = item.accelerator {
                if let Some(first) = seen.iter().find(|i| i.accelerator == Some(stroke)) {
                    return Err(ModuleError::new(format!(
                        "shortcut {} is bound to both `{}` and `{}`",
                        stroke, first.label, item.label
                    )));
                }
                seen.push(item);
            }
        }
        self.menus.push(menu);
        Ok(())
    }

    pub fn remove_menu(&mut self, label: &str) -> Option<Menu> {
        let idx = self.menus.iter().position(|m| m.label == label)?;
        Some(self.menus.remove(idx))
    }

    /// Append an item to an existing menu
    pub fn add_item(&mut self, menu_label: &str, item: MenuItem) -> Result<(), ModuleError> {
        self.check_accelerator_free(&item)?;
        let menu = self
            .menu_mut(menu_label)
            .ok_or_else(|| ModuleError::new(format!("no menu `{}`", menu_label)))?;
        menu.items.push(item);
        Ok(())
    }

    /// Remove the first item with `item_label` from `menu_label`
    pub fn remove_item(&mut self, menu_label: &str, item_label: &str) -> Option<MenuItem> {
        let menu = self.menu_mut(menu_label)?;
        let idx = menu.items.iter().position(|i| i.label == item_label)?;
        Some(menu.items.remove(idx))
    }

    /// Drop every item (in any menu) whose action is `action`
    pub fn remove_action(&mut self, action: &MenuAction) -> usize {
        let mut removed = 0;
        for menu in &mut self.menus {
            let before = menu.items.len();
            menu.items.retain(|i| &i.action != action);
            removed += before - menu.items.len();
        }
        removed
    }

    /// Item bound to `stroke`, if any
    pub fn find_accelerator(&self, stroke: &KeyStroke) -> Option<&MenuItem> {
        self.menus
            .iter()
            .flat_map(|m| m.items.iter())
            .find(|i| i.accelerator.as_ref() == Some(stroke))
    }

    fn check_accelerator_free(&self, item: &MenuItem) -> Result<(), ModuleError> {
        match item.accelerator.as_ref().and_then(|s| self.find_accelerator(s)) {
            Some(existing) => Err(ModuleError::new(format!(
                "shortcut {} is already bound to `{}`",
                existing.accelerator.map(|a| a.to_string()).unwrap_or_default(),
                existing.label
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for MenuBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for menu in &self.menus {
            writeln!(f, "{}", menu.label)?;
            if menu.items.is_empty() {
                writeln!(f, "  (empty)")?;
            }
            for item in &menu.items {
                match &item.accelerator {
                    Some(stroke) => writeln!(f, "  {:<28} {}", item.label, stroke)?,
                    None => writeln!(f, "  {}", item.label)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charger_core::{Key, Modifiers};

    fn ctrl(c: char) -> Option<KeyStroke> {
        Some(KeyStroke::new(Key::Char(c), Modifiers::CTRL))
    }

    #[test]
    fn test_add_and_remove_menu() {
        let mut bar = MenuBar::new();
        bar.add_menu(Menu::new("Demo").with_item(MenuItem::command("Hello", "demo.hello")))
            .unwrap();

        assert!(bar.menu("Demo").is_some());
        assert!(bar.add_menu(Menu::new("Demo")).is_err());

        let removed = bar.remove_menu("Demo").unwrap();
        assert_eq!(removed.items.len(), 1);
        assert!(bar.menu("Demo").is_none());
        assert!(bar.remove_menu("Demo").is_none());
    }

    #[test]
    fn test_add_item_requires_menu() {
        let mut bar = MenuBar::new();
        let err = bar
            .add_item(TOOLS_MENU, MenuItem::command("x", "x"))
            .unwrap_err();
        assert!(err.message().contains("no menu"));

        bar.add_menu(Menu::new(TOOLS_MENU)).unwrap();
        bar.add_item(TOOLS_MENU, MenuItem::command("x", "x")).unwrap();
        assert!(bar.menu(TOOLS_MENU).unwrap().item("x").is_some());

        assert!(bar.remove_item(TOOLS_MENU, "x").is_some());
        assert!(bar.remove_item(TOOLS_MENU, "x").is_none());
    }

    #[test]
    fn test_accelerator_conflicts_rejected() {
        let mut bar = MenuBar::new();
        bar.add_menu(Menu::new(TOOLS_MENU)).unwrap();
        bar.add_item(
            TOOLS_MENU,
            MenuItem::command("First", "first").with_accelerator(ctrl('K')),
        )
        .unwrap();

        let err = bar
            .add_item(
                TOOLS_MENU,
                MenuItem::command("Second", "second").with_accelerator(ctrl('K')),
            )
            .unwrap_err();
        assert!(err.message().contains("First"));

        let err = bar
            .add_menu(
                Menu::new("Other")
                    .with_item(MenuItem::command("Third", "third").with_accelerator(ctrl('K'))),
            )
            .unwrap_err();
        assert!(err.message().contains("already bound"));
    }

    #[test]
    fn test_add_menu_rejects_shortcut_used_twice_inside_it() {
        let mut bar = MenuBar::new();
        let err = bar
            .add_menu(
                Menu::new("Twice")
                    .with_item(MenuItem::command("One", "one").with_accelerator(ctrl('T')))
                    .with_item(MenuItem::command("Two", "two").with_accelerator(ctrl('T'))),
            )
            .unwrap_err();

        assert_eq!(err.message(), "shortcut ctrl T is bound to both `One` and `Two`");
        assert!(bar.menu("Twice").is_none());
        assert!(bar.find_accelerator(&ctrl('T').unwrap()).is_none());
    }

    #[test]
    fn test_find_accelerator() {
        let mut bar = MenuBar::new();
        bar.add_menu(
            Menu::new(TOOLS_MENU).with_item(
                MenuItem::new("Demo", MenuAction::StartModule("demo".to_string()))
                    .with_accelerator(ctrl('D')),
            ),
        )
        .unwrap();

        let hit = bar.find_accelerator(&ctrl('D').unwrap()).unwrap();
        assert_eq!(hit.action, MenuAction::StartModule("demo".to_string()));
        assert!(bar.find_accelerator(&ctrl('E').unwrap()).is_none());
    }

    #[test]
    fn test_remove_action_across_menus() {
        let action = MenuAction::StartModule("demo".to_string());
        let mut bar = MenuBar::new();
        bar.add_menu(Menu::new("A").with_item(MenuItem::new("Demo", action.clone())))
            .unwrap();
        bar.add_menu(Menu::new("B").with_item(MenuItem::new("Demo again", action.clone())))
            .unwrap();

        assert_eq!(bar.remove_action(&action), 2);
        assert!(bar.menu("A").unwrap().items.is_empty());
    }

    #[test]
    fn test_display() {
        let mut bar = MenuBar::new();
        bar.add_menu(
            Menu::new(TOOLS_MENU)
                .with_item(MenuItem::command("Demo", "demo"))
                .with_item(MenuItem::command("Log", "log").with_accelerator(ctrl('L'))),
        )
        .unwrap();
        bar.add_menu(Menu::new("Empty")).unwrap();

        let rendered = bar.to_string();
        assert!(rendered.starts_with("Tools\n  Demo\n"));
        assert!(rendered.contains("ctrl L"));
        assert!(rendered.contains("Empty\n  (empty)"));
    }
}
