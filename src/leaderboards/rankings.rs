//! Leaderboard rankings.
//!
//! Pure queries over the historical rides of a route: per-checkpoint and
//! finish leaderboards, rank of an arbitrary elapsed time, delta to the best
//! time and the next pacing target. Every query is a linear scan; the number
//! of rides per route is small.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recording::types::Ride;
use crate::routes::Route;

/// One historical time on a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// Elapsed time in milliseconds
    pub elapsed_ms: f64,
    /// When the ride was recorded
    pub date: DateTime<Utc>,
    /// Ride this time comes from
    pub ride_id: Uuid,
}

/// Position of a candidate time within a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-indexed position
    pub position: u32,
    /// Field size including the candidate
    pub total_count: u32,
}

/// The next historical time a rider can still catch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingTarget {
    /// 1-indexed rank of the target row
    pub rank: u32,
    /// Target elapsed time in milliseconds
    pub elapsed_ms: f64,
    /// When the target ride was recorded
    pub date: DateTime<Utc>,
    /// Candidate is already slower than every row; the target is last place
    pub trailing_last: bool,
}

/// How the rank moved between two consecutive checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankChange {
    /// Moved up the field
    Improved,
    /// Same position
    Held,
    /// Moved down the field
    Dropped,
}

impl RankChange {
    /// Compare a new position with the previous one (lower is better).
    pub fn between(previous: u32, current: u32) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => Self::Improved,
            std::cmp::Ordering::Equal => Self::Held,
            std::cmp::Ordering::Greater => Self::Dropped,
        }
    }
}

fn rides_for_route<'a>(route: &'a Route, rides: &'a [Ride]) -> impl Iterator<Item = &'a Ride> {
    rides.iter().filter(move |r| r.route_id == route.id)
}

fn sort_rows(rows: &mut [LeaderboardRow]) {
    rows.sort_by(|a, b| a.elapsed_ms.total_cmp(&b.elapsed_ms));
}

/// Leaderboard of elapsed times at one checkpoint, fastest first.
///
/// Rides that never reached the checkpoint are left out.
pub fn checkpoint_leaderboard(
    route: &Route,
    rides: &[Ride],
    checkpoint_index: usize,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = rides_for_route(route, rides)
        .filter_map(|ride| {
            ride.elapsed_at(checkpoint_index).map(|elapsed_ms| LeaderboardRow {
                elapsed_ms,
                date: ride.date,
                ride_id: ride.id,
            })
        })
        .collect();

    sort_rows(&mut rows);
    rows
}

/// Leaderboard of finish times, fastest first.
pub fn finish_leaderboard(route: &Route, rides: &[Ride]) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = rides_for_route(route, rides)
        .filter(|ride| ride.total_ms.is_finite())
        .map(|ride| LeaderboardRow {
            elapsed_ms: ride.total_ms,
            date: ride.date,
            ride_id: ride.id,
        })
        .collect();

    sort_rows(&mut rows);
    rows
}

/// Rank a candidate time against sorted rows.
///
/// A candidate equal to a row ranks ahead of it.
pub fn rank(sorted_rows: &[LeaderboardRow], candidate_ms: f64) -> Standing {
    let total_count = sorted_rows.len() as u32 + 1;
    let position = sorted_rows
        .iter()
        .position(|row| candidate_ms <= row.elapsed_ms)
        .map(|i| i as u32 + 1)
        .unwrap_or(total_count);

    Standing {
        position,
        total_count,
    }
}

/// Difference to the fastest row (positive = behind).
pub fn delta_to_best(sorted_rows: &[LeaderboardRow], candidate_ms: f64) -> Option<f64> {
    sorted_rows.first().map(|best| candidate_ms - best.elapsed_ms)
}

/// Pick the first row the candidate has not yet passed.
pub fn pick_pacing_target(sorted_rows: &[LeaderboardRow], candidate_ms: f64) -> Option<PacingTarget> {
    if let Some((i, row)) = sorted_rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.elapsed_ms >= candidate_ms)
    {
        return Some(PacingTarget {
            rank: i as u32 + 1,
            elapsed_ms: row.elapsed_ms,
            date: row.date,
            trailing_last: false,
        });
    }

    sorted_rows.last().map(|last| PacingTarget {
        rank: sorted_rows.len() as u32,
        elapsed_ms: last.elapsed_ms,
        date: last.date,
        trailing_last: true,
    })
}

/// Live comparison against history for the current elapsed time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveComparison {
    /// Index of the next checkpoint to mark (None when all are marked)
    pub next_checkpoint: Option<usize>,
    /// Best time at the next checkpoint minus now
    pub next_checkpoint_best_ms: Option<f64>,
    /// Best finish time minus now
    pub finish_best_ms: Option<f64>,
    /// Pacing target at the next checkpoint
    pub next_checkpoint_target: Option<PacingTarget>,
    /// Pacing target at the finish
    pub finish_target: Option<PacingTarget>,
}

impl LiveComparison {
    /// Build the comparison for a rider with `marked` checkpoints done.
    pub fn compute(route: &Route, rides: &[Ride], marked: usize, elapsed_ms: f64) -> Self {
        let next_checkpoint = (marked < route.checkpoint_count()).then_some(marked);
        let checkpoint_rows = next_checkpoint
            .map(|i| checkpoint_leaderboard(route, rides, i))
            .unwrap_or_default();
        let finish_rows = finish_leaderboard(route, rides);

        Self {
            next_checkpoint,
            next_checkpoint_best_ms: checkpoint_rows.first().map(|r| r.elapsed_ms - elapsed_ms),
            finish_best_ms: finish_rows.first().map(|r| r.elapsed_ms - elapsed_ms),
            next_checkpoint_target: pick_pacing_target(&checkpoint_rows, elapsed_ms),
            finish_target: pick_pacing_target(&finish_rows, elapsed_ms),
        }
    }
}
