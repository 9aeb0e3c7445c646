use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    bounds::{self, BoundsArgs},
    toy::{self, ToyArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "fluc-sim", about = "Toy Monte-Carlo studies for the flow-fluctuation engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate toy events, assemble their observables and write a report.
    Toy(ToyArgs),
    /// Print the Q-vector table extents a flow configuration requires.
    Bounds(BoundsArgs),
    /// Print the tool version.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,fluc_obs=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Toy(args) => toy::run(&args),
        Command::Bounds(args) => bounds::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
