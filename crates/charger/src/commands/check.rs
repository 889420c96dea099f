use charger_plugins::conformance::{check_registered, check_registry};
use charger_plugins::PluginRegistry;
use charger_store::Paths;

pub fn run(id: Option<&str>) -> anyhow::Result<()> {
    // modules may persist state; keep that out of the user's root
    let scratch = std::env::temp_dir().join(format!("charger-check-{}", std::process::id()));
    let paths = Paths::with_root(&scratch);
    let result = check(&paths, id);
    std::fs::remove_dir_all(&scratch).ok();
    result
}

fn check(paths: &Paths, id: Option<&str>) -> anyhow::Result<()> {
    let registry = PluginRegistry::with_builtins();
    let reports = match id {
        Some(id) => vec![check_registered(&registry, id, paths)],
        None => check_registry(&registry, paths),
    };

    for report in &reports {
        println!("{}", report);
    }

    let failing = reports.iter().filter(|r| !r.is_conforming()).count();
    if failing > 0 {
        anyhow::bail!("{} module(s) failed conformance", failing);
    }
    Ok(())
}
