//! Ride session state machine.
//!
//! A session times one attempt at a route: `Running` until stopped, then
//! `Stopped` until it is saved or discarded. A stopped session never resumes.
//! Every transition returns the notifications it produced instead of
//! displaying them.

use serde::Serialize;
use uuid::Uuid;

use crate::duel::{DuelAnchor, DuelFrame, DuelSimulator};
use crate::leaderboards::rankings::{
    checkpoint_leaderboard, delta_to_best, finish_leaderboard, rank, LiveComparison, RankChange,
    Standing,
};
use crate::recording::types::{Mark, Ride, RideError, RideStatus};
use crate::routes::Route;
use crate::storage::config::DuelSettings;

/// Feedback for a marked checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointFeedback {
    /// Checkpoint index within the route
    pub checkpoint_index: usize,
    /// Checkpoint ID
    pub checkpoint_id: Uuid,
    /// Checkpoint name
    pub checkpoint_name: String,
    /// Elapsed time at the checkpoint
    pub elapsed_ms: f64,
    /// Time since the previous mark (or since the start)
    pub split_ms: f64,
    /// Rank against historical rides at this checkpoint
    pub standing: Standing,
    /// Gap to the fastest historical time here (positive = behind)
    pub delta_to_best_ms: Option<f64>,
    /// Rank movement since the previous checkpoint of this session
    pub rank_change: Option<RankChange>,
}

/// Feedback for a finished ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishFeedback {
    /// Finish elapsed time
    pub elapsed_ms: f64,
    /// Rank against historical finish times
    pub standing: Standing,
    /// Gap to the fastest finish (positive = behind)
    pub delta_to_best_ms: Option<f64>,
}

/// Notification emitted by a session transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RideEvent {
    /// A checkpoint was marked
    CheckpointReached(CheckpointFeedback),
    /// The ride was stopped
    Finished(FinishFeedback),
}

/// A marked checkpoint with its split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLine {
    /// Checkpoint name
    pub checkpoint_name: String,
    /// Elapsed time at the checkpoint
    pub elapsed_ms: f64,
    /// Time since the previous mark
    pub split_ms: f64,
}

/// Everything needed to render one frame of the ride screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RideFrame {
    /// Current elapsed time
    pub elapsed_ms: f64,
    /// Session status
    pub status: RideStatus,
    /// Number of marked checkpoints
    pub marked: usize,
    /// Name of the next checkpoint to mark
    pub next_checkpoint_name: Option<String>,
    /// Duel positions
    pub duel: DuelFrame,
    /// Comparison against history
    pub comparison: LiveComparison,
}

/// One in-progress attempt at a route.
#[derive(Debug, Clone)]
pub struct RideSession {
    id: Uuid,
    route: Route,
    start_ms: f64,
    status: RideStatus,
    marks: Vec<Mark>,
    /// Rank at each marked checkpoint, parallel to `marks`
    mark_ranks: Vec<u32>,
    stopped_elapsed_ms: Option<f64>,
    duel: DuelSimulator,
}

impl RideSession {
    /// Start a ride on `route` at clock reading `now_ms`.
    pub fn start(
        route: &Route,
        rides: &[Ride],
        now_ms: f64,
        settings: DuelSettings,
    ) -> Result<Self, RideError> {
        if route.checkpoints.is_empty() {
            return Err(RideError::InvalidRouteState(format!(
                "route '{}' has no checkpoints",
                route.name
            )));
        }

        let mut duel = DuelSimulator::new(route, rides, settings);
        duel.reset();

        tracing::info!(
            "Started ride on '{}' ({} checkpoints, {} rides of history)",
            route.name,
            route.checkpoint_count(),
            rides.iter().filter(|r| r.route_id == route.id).count()
        );

        Ok(Self {
            id: Uuid::new_v4(),
            route: route.clone(),
            start_ms: now_ms,
            status: RideStatus::Running,
            marks: Vec::new(),
            mark_ranks: Vec::new(),
            stopped_elapsed_ms: None,
            duel,
        })
    }

    /// Mark the next checkpoint at clock reading `now_ms`.
    pub fn mark_next_checkpoint(
        &mut self,
        now_ms: f64,
        rides: &[Ride],
    ) -> Result<Vec<RideEvent>, RideError> {
        if self.status != RideStatus::Running {
            return Err(RideError::NotRunning);
        }

        let index = self.marks.len();
        let checkpoint = self
            .route
            .checkpoints
            .get(index)
            .ok_or(RideError::NoMoreCheckpoints)?;

        // A clock reading older than the last mark must not reorder the marks.
        let previous_ms = self.marks.last().map(|m| m.elapsed_ms).unwrap_or(0.0);
        let elapsed_ms = (now_ms - self.start_ms).max(previous_ms);
        let split_ms = elapsed_ms - previous_ms;
        self.marks.push(Mark {
            checkpoint_id: checkpoint.id,
            elapsed_ms,
        });

        let rows = checkpoint_leaderboard(&self.route, rides, index);
        let standing = rank(&rows, elapsed_ms);
        let delta_to_best_ms = delta_to_best(&rows, elapsed_ms);
        let rank_change = self
            .last_rank_at_checkpoint()
            .map(|previous| RankChange::between(previous, standing.position));
        self.mark_ranks.push(standing.position);

        self.duel.on_checkpoint(index, elapsed_ms);

        tracing::debug!(
            "Checkpoint {} '{}' at {:.0} ms: #{}/{}",
            index,
            checkpoint.name,
            elapsed_ms,
            standing.position,
            standing.total_count
        );

        Ok(vec![RideEvent::CheckpointReached(CheckpointFeedback {
            checkpoint_index: index,
            checkpoint_id: checkpoint.id,
            checkpoint_name: checkpoint.name.clone(),
            elapsed_ms,
            split_ms,
            standing,
            delta_to_best_ms,
            rank_change,
        })])
    }

    /// Remove the most recent mark, if any.
    ///
    /// The next mark's rank change is measured against the remaining last
    /// mark again.
    pub fn undo(&mut self) -> Option<Mark> {
        let removed = self.marks.pop();
        self.mark_ranks.truncate(self.marks.len());
        if let Some(mark) = &removed {
            tracing::debug!("Undid mark at {:.0} ms", mark.elapsed_ms);
        }
        removed
    }

    /// Stop the clock at `now_ms`. Does nothing when already stopped.
    pub fn stop(&mut self, now_ms: f64, rides: &[Ride]) -> Vec<RideEvent> {
        if self.status != RideStatus::Running {
            return Vec::new();
        }

        let elapsed_ms = now_ms - self.start_ms;
        self.status = RideStatus::Stopped;
        self.stopped_elapsed_ms = Some(elapsed_ms);

        let rows = finish_leaderboard(&self.route, rides);
        let standing = rank(&rows, elapsed_ms);

        tracing::info!(
            "Stopped ride on '{}' at {:.0} ms: #{}/{}",
            self.route.name,
            elapsed_ms,
            standing.position,
            standing.total_count
        );

        vec![RideEvent::Finished(FinishFeedback {
            elapsed_ms,
            standing,
            delta_to_best_ms: delta_to_best(&rows, elapsed_ms),
        })]
    }

    /// Elapsed time at clock reading `now_ms`.
    pub fn current_elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.status {
            RideStatus::Running => now_ms - self.start_ms,
            RideStatus::Stopped => self.stopped_elapsed_ms.unwrap_or(0.0),
        }
    }

    /// Produce the record to persist, stopping the ride first if needed.
    ///
    /// Times are rounded to whole milliseconds. Blank names and notes are
    /// dropped.
    pub fn to_persistable_ride(
        &mut self,
        now_ms: f64,
        rides: &[Ride],
        runner_name: Option<&str>,
        note: Option<&str>,
    ) -> (Ride, Vec<RideEvent>) {
        let events = self.stop(now_ms, rides);
        let total_ms = self.current_elapsed_ms(now_ms).round();

        let marks = self
            .marks
            .iter()
            .map(|m| Mark {
                checkpoint_id: m.checkpoint_id,
                elapsed_ms: m.elapsed_ms.round(),
            })
            .collect();

        let ride = Ride::new(self.route.id, total_ms, marks)
            .with_details(non_blank(runner_name), non_blank(note));

        (ride, events)
    }

    /// Render state for the ride screen. Safe to call any number of times.
    pub fn tick(&self, now_ms: f64, rides: &[Ride], track_width_px: f64) -> RideFrame {
        let elapsed_ms = self.current_elapsed_ms(now_ms);
        RideFrame {
            elapsed_ms,
            status: self.status,
            marked: self.marks.len(),
            next_checkpoint_name: self.next_checkpoint().map(|cp| cp.name.clone()),
            duel: self.duel.frame(elapsed_ms, &self.marks, track_width_px),
            comparison: LiveComparison::compute(&self.route, rides, self.marks.len(), elapsed_ms),
        }
    }

    /// Marked checkpoints with their splits.
    pub fn splits(&self) -> Vec<SplitLine> {
        let mut previous = 0.0;
        self.marks
            .iter()
            .zip(&self.route.checkpoints)
            .map(|(mark, cp)| {
                let line = SplitLine {
                    checkpoint_name: cp.name.clone(),
                    elapsed_ms: mark.elapsed_ms,
                    split_ms: mark.elapsed_ms - previous,
                };
                previous = mark.elapsed_ms;
                line
            })
            .collect()
    }

    /// Session ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Route being ridden.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Current status.
    pub fn status(&self) -> RideStatus {
        self.status
    }

    /// Whether the clock is running.
    pub fn is_running(&self) -> bool {
        self.status == RideStatus::Running
    }

    /// Marks recorded so far.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Next checkpoint to mark.
    pub fn next_checkpoint(&self) -> Option<&crate::routes::Checkpoint> {
        self.route.checkpoints.get(self.marks.len())
    }

    /// Frozen elapsed time, once stopped.
    pub fn stopped_elapsed_ms(&self) -> Option<f64> {
        self.stopped_elapsed_ms
    }

    /// Rank at the most recently marked checkpoint.
    pub fn last_rank_at_checkpoint(&self) -> Option<u32> {
        self.mark_ranks.last().copied()
    }

    /// Current duel anchor.
    pub fn duel_anchor(&self) -> DuelAnchor {
        self.duel.anchor()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
