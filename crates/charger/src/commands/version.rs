pub fn run() -> anyhow::Result<()> {
    println!("charger {}", env!("CARGO_PKG_VERSION"));
    println!("Module plugin host for the charger conceptual-graph editor");
    Ok(())
}
