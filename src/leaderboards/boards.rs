//! Leaderboard boards for display.
//!
//! The checkpoint board lists the top rides at every checkpoint and at the
//! finish of one route. The history board ranks rides across routes by total
//! time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::rankings::{checkpoint_leaderboard, finish_leaderboard, LeaderboardRow};
use crate::recording::types::Ride;
use crate::routes::Route;
use crate::storage::config::LeaderboardSettings;

/// Leaderboard entry enriched with ride details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Rank on leaderboard (1-indexed)
    pub rank: u32,
    /// Ride this entry comes from
    pub ride_id: Uuid,
    /// Rider or attempt name
    pub runner_name: Option<String>,
    /// Free-form note
    pub note: Option<String>,
    /// Elapsed time in milliseconds
    pub elapsed_ms: f64,
    /// When recorded
    pub recorded_at: DateTime<Utc>,
}

/// Top entries at one checkpoint (or at the finish).
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointBoard {
    /// Board title: the checkpoint name, or "Finish"
    pub title: String,
    /// Checkpoint index; None for the finish board
    pub checkpoint_index: Option<usize>,
    /// Top entries, fastest first
    pub entries: Vec<LeaderboardEntry>,
}

/// Checkpoint boards for every checkpoint plus the finish.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteBoards {
    /// Route ID
    pub route_id: Uuid,
    /// Route name
    pub route_name: String,
    /// One board per checkpoint, followed by the finish board
    pub boards: Vec<CheckpointBoard>,
}

impl RouteBoards {
    /// Build the boards, keeping the `top_n` fastest entries of each.
    pub fn build(route: &Route, rides: &[Ride], top_n: usize) -> Self {
        let by_id: HashMap<Uuid, &Ride> = rides.iter().map(|r| (r.id, r)).collect();

        let mut boards: Vec<CheckpointBoard> = route
            .checkpoints
            .iter()
            .enumerate()
            .map(|(i, cp)| CheckpointBoard {
                title: cp.name.clone(),
                checkpoint_index: Some(i),
                entries: enrich(&checkpoint_leaderboard(route, rides, i), &by_id, top_n),
            })
            .collect();

        boards.push(CheckpointBoard {
            title: "Finish".to_string(),
            checkpoint_index: None,
            entries: enrich(&finish_leaderboard(route, rides), &by_id, top_n),
        });

        Self {
            route_id: route.id,
            route_name: route.name.clone(),
            boards,
        }
    }

    /// The finish board.
    pub fn finish(&self) -> Option<&CheckpointBoard> {
        self.boards.last()
    }
}

fn enrich(
    rows: &[LeaderboardRow],
    by_id: &HashMap<Uuid, &Ride>,
    top_n: usize,
) -> Vec<LeaderboardEntry> {
    rows.iter()
        .take(top_n)
        .enumerate()
        .map(|(i, row)| {
            let ride = by_id.get(&row.ride_id);
            LeaderboardEntry {
                rank: i as u32 + 1,
                ride_id: row.ride_id,
                runner_name: ride.and_then(|r| r.runner_name.clone()),
                note: ride.and_then(|r| r.note.clone()),
                elapsed_ms: row.elapsed_ms,
                recorded_at: row.date,
            }
        })
        .collect()
}

/// A ride on the history board.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Rank on the board (1-indexed)
    pub rank: u32,
    /// Route name, if the route is known
    pub route_name: Option<String>,
    /// The ride
    pub ride: Ride,
}

/// Filter for the history board.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    /// Only rides on this route
    pub route_id: Option<Uuid>,
    /// Only rides on routes from this source platform
    pub source: Option<String>,
    /// Maximum number of entries
    pub limit: usize,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            route_id: None,
            source: None,
            limit: LeaderboardSettings::default().history_limit,
        }
    }
}

/// Rank rides across routes by total time, fastest first.
pub fn history_board(routes: &[Route], rides: &[Ride], filter: &HistoryFilter) -> Vec<HistoryEntry> {
    let routes_by_id: HashMap<Uuid, &Route> = routes.iter().map(|r| (r.id, r)).collect();

    let mut selected: Vec<&Ride> = rides
        .iter()
        .filter(|ride| filter.route_id.map_or(true, |id| ride.route_id == id))
        .filter(|ride| match &filter.source {
            Some(source) => routes_by_id
                .get(&ride.route_id)
                .and_then(|route| route.source.as_ref())
                .map_or(false, |s| s == source),
            None => true,
        })
        .collect();

    selected.sort_by(|a, b| a.total_ms.total_cmp(&b.total_ms));

    selected
        .into_iter()
        .take(filter.limit)
        .enumerate()
        .map(|(i, ride)| HistoryEntry {
            rank: i as u32 + 1,
            route_name: routes_by_id.get(&ride.route_id).map(|r| r.name.clone()),
            ride: ride.clone(),
        })
        .collect()
}
