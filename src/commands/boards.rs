use anyhow::Result;
use splitride::leaderboards::boards::{history_board, HistoryFilter, LeaderboardEntry, RouteBoards};
use splitride::leaderboards::format::{format_km, format_time, format_time_short};

use super::{find_route, Store};
use crate::cli::{BoardsArgs, HistoryArgs};

pub fn list_routes(store: &Store) -> Result<()> {
    let routes = store.db.list_routes()?;

    for (i, route) in routes.iter().enumerate() {
        let rides = store.db.count_rides(&route.id)?;
        println!(
            "{:>2}. {}  [{}]  {}  {} checkpoints, {} rides",
            i + 1,
            route.name,
            route.source.as_deref().unwrap_or("-"),
            format_km(route.total_distance_km),
            route.checkpoint_count(),
            rides
        );
    }

    Ok(())
}

pub fn route_boards(store: &Store, args: BoardsArgs) -> Result<()> {
    let route = find_route(&store.db.list_routes()?, &args.route)?;
    let rides = store.db.list_rides_for_route(&route.id)?;
    let top_n = args.top.unwrap_or(store.config.leaderboard.segment_top_n);

    let boards = RouteBoards::build(&route, &rides, top_n);
    println!("{} ({} rides)", boards.route_name, rides.len());

    for board in &boards.boards {
        println!();
        println!("{}", board.title);
        if board.entries.is_empty() {
            println!("   no times yet");
        }
        for entry in &board.entries {
            println!("   {}", entry_line(entry));
        }
    }

    Ok(())
}

pub fn history(store: &Store, args: HistoryArgs) -> Result<()> {
    let routes = store.db.list_routes()?;
    let route_id = match &args.route {
        Some(query) => Some(find_route(&routes, query)?.id),
        None => None,
    };

    let filter = HistoryFilter {
        route_id,
        source: args.source,
        limit: args.limit.unwrap_or(store.config.leaderboard.history_limit),
    };

    let entries = history_board(&routes, &store.db.list_rides()?, &filter);
    if entries.is_empty() {
        println!("No rides yet");
    }

    for entry in entries {
        println!(
            "{:>3}. {}  {}  {}  {}",
            entry.rank,
            format_time(entry.ride.total_ms),
            entry.route_name.as_deref().unwrap_or("?"),
            entry.ride.runner_name.as_deref().unwrap_or("-"),
            entry.ride.date.format("%d.%m.%Y")
        );
    }

    Ok(())
}

fn entry_line(entry: &LeaderboardEntry) -> String {
    let mut line = format!(
        "{}. {:>8}  {}  {}",
        entry.rank,
        format_time_short(entry.elapsed_ms),
        entry.runner_name.as_deref().unwrap_or("-"),
        entry.recorded_at.format("%d.%m.%Y")
    );
    if let Some(note) = &entry.note {
        line.push_str(&format!("  ({note})"));
    }
    line
}
