use anyhow::Context;
use charger_core::KeyStroke;
use charger_plugins::{Activation, PluginHost};
use charger_store::Paths;

/// Stop everything still running, surfacing the first failure
fn finish(host: &mut PluginHost) -> anyhow::Result<()> {
    let mut errors = host.shutdown_all().into_iter();
    match errors.next() {
        Some(first) => {
            for err in errors {
                eprintln!("error: {}", err);
            }
            Err(first.into())
        }
        None => Ok(()),
    }
}

pub fn run(paths: &Paths, id: &str) -> anyhow::Result<()> {
    let mut host = super::open_host(paths)?;
    let name = host
        .descriptor(id)
        .map(|d| d.name.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown or disabled module `{}`", id))?;

    host.start(id)?;
    println!("Started {} [{}]", name, id);
    print!("{}", host.menu_bar());

    finish(&mut host)?;
    println!("Stopped {} [{}]", name, id);
    Ok(())
}

pub fn run_press(paths: &Paths, stroke: &str) -> anyhow::Result<()> {
    let stroke: KeyStroke = stroke
        .parse()
        .with_context(|| format!("invalid shortcut `{}`", stroke))?;

    let mut host = super::open_host(paths)?;
    match host.activate_shortcut(&stroke)? {
        Some(Activation::Started(id)) => {
            println!("{} started [{}]", stroke, id);
            print!("{}", host.menu_bar());
            finish(&mut host)
        }
        Some(Activation::Command(command)) => {
            println!("{} -> command {}", stroke, command);
            Ok(())
        }
        None => anyhow::bail!("no menu item is bound to {}", stroke),
    }
}
