//! Core types shared by the charger module host: key strokes, descriptors,
//! lifecycle states, errors and host configuration

mod config;
mod error;
mod keystroke;
mod lifecycle;
mod types;

pub use config::{AcceleratorSetting, DuplicatePolicy, HostConfig};
pub use error::{ModuleError, PluginError, Result};
pub use keystroke::{Key, KeyStroke, KeyStrokeError, Modifiers};
pub use lifecycle::{LifecycleEvent, LifecycleOp, LifecycleState};
pub use types::PluginDescriptor;
