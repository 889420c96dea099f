//! Module plugin contract and the host that discovers and drives modules

pub mod base;
pub mod conformance;
pub mod demo;
pub mod host;
pub mod menu;
pub mod registry;
pub mod sessionlog;

pub use base::{load_state, read_descriptor, save_state, HostContext, ModulePlugin};
pub use conformance::ConformanceReport;
pub use demo::DemoPlugin;
pub use host::{Activation, DiscoveryReport, PluginHost};
pub use menu::{Menu, MenuAction, MenuBar, MenuItem, TOOLS_MENU};
pub use registry::{PluginFactory, PluginRegistry};
pub use sessionlog::SessionLogPlugin;
