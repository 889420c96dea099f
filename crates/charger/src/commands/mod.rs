pub mod check;
pub mod journal;
pub mod menu;
pub mod plugins;
pub mod run;
pub mod version;

use charger_core::HostConfig;
use charger_plugins::{PluginHost, PluginRegistry};
use charger_store::Paths;

/// Discover the built-in modules under the user's configuration
pub fn open_host(paths: &Paths) -> anyhow::Result<PluginHost> {
    let config = HostConfig::load(&paths.config_file())?;
    let (host, report) =
        PluginHost::discover(PluginRegistry::with_builtins(), config, paths.clone());

    for err in &report.rejected {
        eprintln!("warning: {}", err);
    }
    Ok(host)
}
