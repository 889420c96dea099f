mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let paths = charger_store::Paths::new()?;

    match cli.command {
        Commands::List { json } => commands::plugins::run_list(&paths, json),
        Commands::Info { id } => commands::plugins::run_info(&paths, &id),
        Commands::Enable { id } => commands::plugins::run_enable(&paths, &id),
        Commands::Disable { id } => commands::plugins::run_disable(&paths, &id),
        Commands::Menu => commands::menu::run(&paths),
        Commands::Run { id } => commands::run::run(&paths, &id),
        Commands::Press { stroke } => commands::run::run_press(&paths, &stroke),
        Commands::Check { id } => commands::check::run(id.as_deref()),
        Commands::Journal { limit } => commands::journal::run(&paths, limit),
        Commands::Version => commands::version::run(),
    }
}
