mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardiogate", about = "Cardiac phase gating of intravascular pullbacks")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect diastolic and systolic frames
    Gate(commands::gate::GateArgs),
    /// Print the per-frame gating signals
    Signals(commands::signals::SignalsArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Gate(args) => commands::gate::run(args),
        Commands::Signals(args) => commands::signals::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
