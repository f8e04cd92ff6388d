//! SplitRide - Checkpoint Split Timer
//!
//! Main entry point for the command line application.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run() {
        tracing::error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            tracing::error!(cause = %cause, "caused by");
        }
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut store = commands::Store::open(cli.data_dir)?;

    tracing::info!("Starting SplitRide v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Routes => commands::boards::list_routes(&store),
        Commands::Boards(args) => commands::boards::route_boards(&store, args),
        Commands::History(args) => commands::boards::history(&store, args),
        Commands::Ride(args) => commands::ride::run(&mut store, args),
        Commands::DeleteRide(args) => commands::export::delete_ride(&store, args),
        Commands::DeleteRoute(args) => commands::export::delete_route(&store, args),
        Commands::Export => commands::export::run(&store),
    }
}
