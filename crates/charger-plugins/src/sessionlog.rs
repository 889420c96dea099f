//! Session log module: counts activations across runs

use crate::base::{HostContext, ModulePlugin};
use crate::menu::{MenuItem, TOOLS_MENU};
use charger_core::{Key, KeyStroke, ModuleError, Modifiers};
use serde::{Deserialize, Serialize};

const SHOW_ITEM: &str = "Show Session Log";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogState {
    pub activations: u64,
    pub last_started: Option<String>,
    pub last_stopped: Option<String>,
}

pub struct SessionLogPlugin {
    info: String,
    activations: u64,
}

impl SessionLogPlugin {
    pub const ID: &'static str = "session-log";

    pub fn new() -> Self {
        Self {
            info: format!(
                "Session Log {}: records how often the editor's modules are activated",
                env!("CARGO_PKG_VERSION")
            ),
            activations: 0,
        }
    }

    /// Activations seen by the last `startup`, including it
    pub fn activations(&self) -> u64 {
        self.activations
    }
}

impl Default for SessionLogPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulePlugin for SessionLogPlugin {
    fn name(&self) -> &str {
        "Session Log"
    }

    fn key_stroke(&self) -> Option<KeyStroke> {
        Some(KeyStroke::new(
            Key::Char('L'),
            Modifiers::CTRL | Modifiers::SHIFT,
        ))
    }

    fn info(&self) -> &str {
        &self.info
    }

    fn startup(&mut self, ctx: &mut HostContext<'_>) -> Result<(), ModuleError> {
        ctx.menu_mut()
            .add_item(TOOLS_MENU, MenuItem::command(SHOW_ITEM, "session-log.show"))?;

        // only a startup that reached the menu counts as an activation
        let state = match record_activation(ctx) {
            Ok(state) => state,
            Err(err) => {
                ctx.menu_mut().remove_item(TOOLS_MENU, SHOW_ITEM);
                return Err(err);
            }
        };

        self.activations = state.activations;
        tracing::info!(activations = state.activations, "session log started");
        Ok(())
    }

    fn shutdown(&mut self, ctx: &mut HostContext<'_>) -> Result<(), ModuleError> {
        ctx.menu_mut().remove_item(TOOLS_MENU, SHOW_ITEM);

        let mut state: SessionLogState = ctx.load_state()?;
        state.last_stopped = Some(chrono::Utc::now().to_rfc3339());
        ctx.save_state(&state)
    }
}

fn record_activation(ctx: &HostContext<'_>) -> Result<SessionLogState, ModuleError> {
    let mut state: SessionLogState = ctx.load_state()?;
    state.activations += 1;
    state.last_started = Some(chrono::Utc::now().to_rfc3339());
    ctx.save_state(&state)?;
    Ok(state)
}
