use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "charger")]
#[command(version)]
#[command(about = "Module plugin host for the charger conceptual-graph editor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List discovered modules and their state
    List {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one module's descriptor
    Info { id: String },

    /// Enable a module
    Enable { id: String },

    /// Disable a module
    Disable { id: String },

    /// Print the menu bar built from module descriptors
    Menu,

    /// Start a module, show the menus it produced, then shut it down
    Run { id: String },

    /// Activate whatever menu item a shortcut is bound to, e.g. "ctrl shift L"
    Press { stroke: String },

    /// Run conformance checks against one module or all of them
    Check { id: Option<String> },

    /// Show recent lifecycle events
    Journal {
        /// Number of events to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Print version information
    Version,
}
