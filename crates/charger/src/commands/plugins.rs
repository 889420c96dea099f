use charger_core::{HostConfig, LifecycleState, PluginDescriptor};
use charger_plugins::PluginRegistry;
use charger_store::Paths;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ModuleRow<'a> {
    #[serde(flatten)]
    descriptor: &'a PluginDescriptor,
    state: LifecycleState,
}

fn set_module_enabled(config_path: &Path, id: &str, enabled: bool) -> anyhow::Result<()> {
    if !PluginRegistry::with_builtins().contains(id) {
        anyhow::bail!("unknown module `{}`", id);
    }

    let mut config = HostConfig::load(config_path)?;
    config.set_enabled(id, enabled);
    config.save(config_path)?;
    Ok(())
}

pub fn run_list(paths: &Paths, json: bool) -> anyhow::Result<()> {
    let host = super::open_host(paths)?;

    if json {
        let rows: Vec<ModuleRow> = host
            .descriptors()
            .map(|d| ModuleRow {
                descriptor: d,
                state: host.state(&d.id).unwrap_or(LifecycleState::Discovered),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Registered Modules");
    println!("==================");
    for desc in host.descriptors() {
        let shortcut = desc
            .accelerator
            .map(|a| format!("  <{}>", a))
            .unwrap_or_default();
        println!("  {} [{}]{}", desc.name, desc.id, shortcut);
        if !desc.info.is_empty() {
            println!("    {}", desc.info);
        }
    }

    let config = host.config();
    for id in PluginRegistry::with_builtins().ids() {
        if !config.is_enabled(id) {
            println!("  ({} disabled)", id);
        }
    }
    Ok(())
}

pub fn run_info(paths: &Paths, id: &str) -> anyhow::Result<()> {
    let host = super::open_host(paths)?;
    let desc = host
        .descriptor(id)
        .ok_or_else(|| anyhow::anyhow!("unknown or disabled module `{}`", id))?;

    println!("id:       {}", desc.id);
    println!("name:     {}", desc.name);
    println!(
        "shortcut: {}",
        desc.accelerator
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("info:     {}", desc.info);
    Ok(())
}

pub fn run_enable(paths: &Paths, id: &str) -> anyhow::Result<()> {
    set_module_enabled(&paths.config_file(), id, true)?;
    println!("Enabled module: {}", id);
    Ok(())
}

pub fn run_disable(paths: &Paths, id: &str) -> anyhow::Result<()> {
    set_module_enabled(&paths.config_file(), id, false)?;
    println!("Disabled module: {}", id);
    Ok(())
}
