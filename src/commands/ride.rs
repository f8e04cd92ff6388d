use std::io::{self, BufRead, Write};

use anyhow::Result;
use splitride::duel::{track_marks, DuelFrame, TrackGeometry};
use splitride::leaderboards::format::{format_signed, format_time, format_time_short};
use splitride::leaderboards::{PacingTarget, RankChange};
use splitride::recording::{MonotonicClock, RideDesk, RideEvent, RideFrame, SplitLine};
use splitride::routes::Route;
use splitride::storage::config::AppConfig;

use super::{find_route, Store};
use crate::cli::RideArgs;

/// Track pixels drawn per terminal column.
const PX_PER_COLUMN: f64 = 4.0;

const HELP: &str = "[Enter] next checkpoint  [u] undo  [s] stop  [t] time  [w] save  [q] discard";

pub fn run(store: &mut Store, args: RideArgs) -> Result<()> {
    let route = find_route(&store.db.list_routes()?, &args.route)?;
    let rides = store.db.list_rides_for_route(&route.id)?;
    let columns = store.config.ride.track_width.max(10);
    let width_px = columns as f64 * PX_PER_COLUMN;

    let mut desk = RideDesk::new(MonotonicClock::new(), store.config.duel.clone());
    let id = desk.start(&route, &rides)?;

    println!(
        "{} - {} checkpoints, {} rides to beat",
        route.name,
        route.checkpoint_count(),
        rides.len()
    );
    println!("{HELP}");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "" | "n" => match desk.mark_next_checkpoint(id, &rides) {
                Ok(events) => print_events(&events),
                Err(e) => println!("{e}"),
            },
            "u" => match desk.undo(id)? {
                Some(mark) => println!("Removed mark at {}", format_time(mark.elapsed_ms)),
                None => println!("Nothing to undo"),
            },
            "s" => print_events(&desk.stop(id, &rides)?),
            "t" => {
                if let Some(session) = desk.session() {
                    print_splits(&session.splits());
                }
            }
            "w" => {
                let name = match &args.name {
                    Some(name) => name.clone(),
                    None => default_runner_name(&store.config),
                };
                let (ride, events) = desk.save(id, &rides, Some(&name), args.note.as_deref())?;
                print_events(&events);
                store.db.insert_ride(&ride)?;
                println!(
                    "Saved {} ({})",
                    ride.runner_name.as_deref().unwrap_or("-"),
                    format_time(ride.total_ms)
                );
                return Ok(());
            }
            "q" => {
                desk.discard(id)?;
                println!("Ride discarded");
                return Ok(());
            }
            _ => {
                println!("{HELP}");
                continue;
            }
        }

        let frame = desk.tick(id, &rides, width_px)?;
        print_frame(&route, &frame, columns, store.config.duel.track_padding_px);
        io::stdout().flush()?;
    }

    // stdin closed without a save
    desk.discard(id)?;
    Ok(())
}

fn default_runner_name(config: &AppConfig) -> String {
    format!(
        "{} {}",
        config.ride.default_runner_name_prefix,
        chrono::Local::now().format("%d.%m.%Y")
    )
}

fn print_events(events: &[RideEvent]) {
    for event in events {
        match event {
            RideEvent::CheckpointReached(cp) => {
                let mut line = format!(
                    "{:<12} {}  split {}  #{}/{}",
                    cp.checkpoint_name,
                    format_time(cp.elapsed_ms),
                    format_time_short(cp.split_ms),
                    cp.standing.position,
                    cp.standing.total_count
                );
                if let Some(delta) = cp.delta_to_best_ms {
                    line.push_str(&format!("  {} to best", format_signed(delta)));
                }
                match cp.rank_change {
                    Some(RankChange::Improved) => line.push_str("  ▲"),
                    Some(RankChange::Dropped) => line.push_str("  ▼"),
                    _ => {}
                }
                println!("{line}");
            }
            RideEvent::Finished(finish) => {
                let mut line = format!(
                    "Finish       {}  #{}/{}",
                    format_time(finish.elapsed_ms),
                    finish.standing.position,
                    finish.standing.total_count
                );
                if let Some(delta) = finish.delta_to_best_ms {
                    line.push_str(&format!("  {} to best", format_signed(delta)));
                }
                println!("{line}");
            }
        }
    }
}

fn print_frame(route: &Route, frame: &RideFrame, columns: usize, padding_px: f64) {
    println!("{}", render_track(route, &frame.duel, columns, padding_px));

    let mut status = format!(
        "{}  {}/{}",
        format_time(frame.elapsed_ms),
        frame.marked,
        route.checkpoint_count()
    );
    if let Some(name) = &frame.next_checkpoint_name {
        status.push_str(&format!("  next: {name}"));
    }
    println!("{status}");

    let comparison = &frame.comparison;
    let mut pacing = String::new();
    if let Some(gap) = comparison.next_checkpoint_best_ms {
        pacing.push_str(&format!("best CP {}", format_signed(gap)));
    }
    if let Some(target) = &comparison.next_checkpoint_target {
        pacing.push_str(&format!("  {}", target_label(target)));
    }
    if let Some(gap) = comparison.finish_best_ms {
        pacing.push_str(&format!("  best finish {}", format_signed(gap)));
    }
    if let Some(target) = &comparison.finish_target {
        pacing.push_str(&format!("  finish {}", target_label(target)));
    }
    if !pacing.is_empty() {
        println!("{}", pacing.trim_start());
    }
}

fn target_label(target: &PacingTarget) -> String {
    let label = if target.trailing_last { "last" } else { "chasing" };
    format!(
        "{} #{} {}",
        label,
        target.rank,
        format_time_short(target.elapsed_ms)
    )
}

fn print_splits(splits: &[SplitLine]) {
    if splits.is_empty() {
        println!("No marks yet");
    }
    for (i, split) in splits.iter().enumerate() {
        println!(
            "{:>2}. {:<12} {}  split {}",
            i + 1,
            split.checkpoint_name,
            format_time(split.elapsed_ms),
            format_time_short(split.split_ms)
        );
    }
}

/// Draw the duel track: `|` checkpoints, `B` best ride, `R` rider.
fn render_track(route: &Route, duel: &DuelFrame, columns: usize, padding_px: f64) -> String {
    let mut cells = vec!['-'; columns];
    let last = columns.saturating_sub(1);
    let column = |px: f64| ((px / PX_PER_COLUMN).floor().max(0.0) as usize).min(last);

    let geometry = TrackGeometry::new(columns as f64 * PX_PER_COLUMN, padding_px);
    for mark in track_marks(route) {
        cells[column(geometry.px(mark.fraction))] = '|';
    }

    cells[column(duel.best_px)] = 'B';
    cells[column(duel.rider_px)] = 'R';
    cells.into_iter().collect()
}
