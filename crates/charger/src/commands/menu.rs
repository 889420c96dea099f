use charger_store::Paths;

pub fn run(paths: &Paths) -> anyhow::Result<()> {
    let host = super::open_host(paths)?;
    print!("{}", host.menu_bar());
    Ok(())
}
