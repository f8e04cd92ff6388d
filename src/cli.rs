use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "splitride",
    version,
    about = "Checkpoint split timer for cycling routes"
)]
pub struct Cli {
    /// Override the data directory (config.toml and splitride.db)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List routes
    Routes,
    /// Show checkpoint and finish leaderboards of a route
    Boards(BoardsArgs),
    /// Show the history board across routes
    History(HistoryArgs),
    /// Time a ride interactively
    Ride(RideArgs),
    /// Delete a saved ride
    DeleteRide(DeleteRideArgs),
    /// Delete a route with its checkpoints and rides
    DeleteRoute(DeleteRouteArgs),
    /// Print all routes and rides as JSON
    Export,
}

#[derive(Args, Debug, Clone)]
pub struct BoardsArgs {
    /// Route name, ID or list number
    pub route: String,

    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Only routes from this platform (e.g. Zwift, Kinomap)
    #[arg(long)]
    pub source: Option<String>,

    /// Only rides on this route
    #[arg(long)]
    pub route: Option<String>,

    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct RideArgs {
    /// Route name, ID or list number
    pub route: String,

    /// Name saved with the ride
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteRideArgs {
    pub id: uuid::Uuid,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteRouteArgs {
    /// Route name, ID or list number
    pub route: String,
}
