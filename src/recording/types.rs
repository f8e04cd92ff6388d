//! Recording types: saved rides, marks, session status and errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Status of an active ride session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideStatus {
    /// Clock is running, checkpoints can be marked
    Running,
    /// Clock is frozen, the ride can only be saved or discarded
    Stopped,
}

/// Elapsed time at which a checkpoint was reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    /// Checkpoint this mark belongs to
    pub checkpoint_id: Uuid,
    /// Milliseconds since ride start
    pub elapsed_ms: f64,
}

/// A completed ride over a route.
///
/// Marks are positionally aligned with the route's checkpoints: mark `i`
/// belongs to checkpoint `i`. An abandoned ride may carry fewer marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    /// Unique identifier
    pub id: Uuid,
    /// Route the ride was recorded on
    pub route_id: Uuid,
    /// When the ride was saved
    #[serde(rename = "dateIso")]
    pub date: DateTime<Utc>,
    /// Finish elapsed time in milliseconds
    pub total_ms: f64,
    /// Checkpoint marks in route order
    #[serde(default)]
    pub marks: Vec<Mark>,
    /// Rider or attempt name
    #[serde(default)]
    pub runner_name: Option<String>,
    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,
}

impl Ride {
    /// Create a ride record from raw marks.
    pub fn new(route_id: Uuid, total_ms: f64, marks: Vec<Mark>) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id,
            date: Utc::now(),
            total_ms,
            marks,
            runner_name: None,
            note: None,
        }
    }

    /// Set runner name and note.
    pub fn with_details(mut self, runner_name: Option<String>, note: Option<String>) -> Self {
        self.runner_name = runner_name;
        self.note = note;
        self
    }

    /// Elapsed time at the given checkpoint index, if reached.
    pub fn elapsed_at(&self, checkpoint_index: usize) -> Option<f64> {
        self.marks
            .get(checkpoint_index)
            .map(|m| m.elapsed_ms)
            .filter(|t| t.is_finite())
    }
}

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RideError {
    #[error("Route cannot be ridden: {0}")]
    InvalidRouteState(String),

    #[error("Ride is not running")]
    NotRunning,

    #[error("All checkpoints have already been marked")]
    NoMoreCheckpoints,

    #[error("No active ride session")]
    NoActiveSession,

    #[error("A ride session is already in progress")]
    SessionInProgress,

    #[error("Ride session {0} is no longer active")]
    StaleSession(Uuid),
}
