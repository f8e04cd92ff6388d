//! Route definitions.
//!
//! A route is an ordered list of checkpoints. The first checkpoint is the
//! start, the last one is the finish. Routes are owned by the route store and
//! are read-only to the timing core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named waypoint on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Distance from route start in kilometers (if known)
    #[serde(default)]
    pub distance_km: Option<f64>,
}

impl Checkpoint {
    /// Create a checkpoint with a fresh id.
    pub fn new(name: impl Into<String>, distance_km: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            distance_km,
        }
    }
}

/// A timed route with ordered checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Platform the route is ridden on (e.g. "Zwift", "Kinomap")
    #[serde(default)]
    pub source: Option<String>,
    /// Total route distance in kilometers
    #[serde(default)]
    pub total_distance_km: Option<f64>,
    /// Total ascent in meters
    #[serde(default)]
    pub total_ascent_m: Option<f64>,
    /// Ordered checkpoints, start first and finish last
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
}

impl Route {
    /// Create an empty route.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source: None,
            total_distance_km: None,
            total_ascent_m: None,
            checkpoints: Vec::new(),
        }
    }

    /// Set the total distance.
    pub fn with_distance(mut self, total_distance_km: f64) -> Self {
        self.total_distance_km = Some(total_distance_km);
        self
    }

    /// Set the source platform.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Append a checkpoint.
    pub fn with_checkpoint(mut self, name: impl Into<String>, distance_km: Option<f64>) -> Self {
        self.checkpoints.push(Checkpoint::new(name, distance_km));
        self
    }

    /// Number of checkpoints.
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Index of the finish checkpoint.
    pub fn finish_index(&self) -> Option<usize> {
        self.checkpoints.len().checked_sub(1)
    }

    /// Label used on the duel track: START, CP{n} or FINISH.
    pub fn track_label(&self, index: usize) -> String {
        if index == 0 {
            "START".to_string()
        } else if Some(index) == self.finish_index() {
            "FINISH".to_string()
        } else {
            format!("CP{}", index + 1)
        }
    }
}
