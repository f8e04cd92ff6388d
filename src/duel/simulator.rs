//! Duel simulator.
//!
//! Moves a ghost of the best ride and the live rider along a normalized
//! track. Between checkpoints the ghost advances on the schedule of the best
//! ride's splits. At every marked checkpoint the rider's marker is re-anchored
//! and nudged by a stepped pixel offset reflecting the gap to the best time.

use serde::{Deserialize, Serialize};

use super::track::{best_cumulative_times, checkpoint_fractions, TrackGeometry};
use crate::recording::types::{Mark, Ride};
use crate::routes::Route;
use crate::storage::config::DuelSettings;

/// Where the current segment starts and how far the rider's marker is nudged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuelAnchor {
    /// Index of the checkpoint the active segment starts at
    pub segment_index: usize,
    /// Rider elapsed time at which the segment started
    pub segment_start_elapsed_ms: f64,
    /// Signed pixel nudge of the rider marker (negative = behind)
    pub offset_px: f64,
}

impl Default for DuelAnchor {
    fn default() -> Self {
        Self {
            segment_index: 0,
            segment_start_elapsed_ms: 0.0,
            offset_px: 0.0,
        }
    }
}

/// Positions produced for one animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuelFrame {
    /// Segment used for interpolation
    pub segment_index: usize,
    /// Progress through the segment (0..1)
    pub progress: f64,
    /// Interpolated ghost position (0..1)
    pub fraction: f64,
    /// Rider marker nudge in pixels
    pub offset_px: f64,
    /// Ghost marker position in pixels
    pub best_px: f64,
    /// Rider marker position in pixels
    pub rider_px: f64,
    /// Ghost marker position as a percentage of track width
    pub best_percent: f64,
    /// Rider marker position as a percentage of track width
    pub rider_percent: f64,
}

/// Stepped pixel offset for a gap to the best time.
///
/// Every full step of `step_ms` moves the rider marker `step_px` pixels;
/// behind moves it backward.
pub fn quantized_offset(delta_ms: f64, settings: &DuelSettings) -> f64 {
    let steps = (delta_ms.abs() / settings.step_ms).floor();
    let magnitude = steps * settings.step_px;
    if magnitude == 0.0 {
        0.0
    } else if delta_ms > 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Ghost/rider duel along a route track.
#[derive(Debug, Clone)]
pub struct DuelSimulator {
    fractions: Vec<f64>,
    best_times: Vec<Option<f64>>,
    anchor: DuelAnchor,
    settings: DuelSettings,
}

impl DuelSimulator {
    /// Build the duel for a route against its historical rides.
    pub fn new(route: &Route, rides: &[Ride], settings: DuelSettings) -> Self {
        Self {
            fractions: checkpoint_fractions(route),
            best_times: best_cumulative_times(route, rides),
            anchor: DuelAnchor::default(),
            settings,
        }
    }

    /// Reset to checkpoint 0 with no offset.
    pub fn reset(&mut self) {
        self.anchor = DuelAnchor::default();
    }

    /// Current anchor.
    pub fn anchor(&self) -> DuelAnchor {
        self.anchor
    }

    /// Checkpoint fractions along the track.
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Pacing line cumulative times.
    pub fn best_times(&self) -> &[Option<f64>] {
        &self.best_times
    }

    /// Re-anchor at a checkpoint crossing.
    ///
    /// Returns the gap to the pacing line, or None when the pacing line has
    /// no time for this checkpoint (the anchor is left untouched then).
    pub fn on_checkpoint(&mut self, index: usize, elapsed_ms: f64) -> Option<f64> {
        let best = self.best_times.get(index).copied().flatten()?;
        let delta = elapsed_ms - best;

        self.anchor = DuelAnchor {
            segment_index: index,
            segment_start_elapsed_ms: elapsed_ms,
            offset_px: quantized_offset(delta, &self.settings),
        };

        tracing::debug!(
            "Duel re-anchored at checkpoint {} (delta {:.0} ms, offset {} px)",
            index,
            delta,
            self.anchor.offset_px
        );

        Some(delta)
    }

    /// Interpolated positions for the given elapsed time.
    ///
    /// The segment is re-derived from the marks so that an undone mark does
    /// not leave the duel anchored past the rider.
    pub fn frame(&self, elapsed_ms: f64, marks: &[Mark], width_px: f64) -> DuelFrame {
        let track = TrackGeometry::new(width_px, self.settings.track_padding_px);
        let last = self.fractions.len().saturating_sub(1);

        let segment_index = self.anchor.segment_index.min(marks.len()).min(last);
        let segment_start = if segment_index < self.anchor.segment_index {
            marks.last().map(|m| m.elapsed_ms).unwrap_or(0.0)
        } else {
            self.anchor.segment_start_elapsed_ms
        };

        let start_fraction = self.fractions.get(segment_index).copied().unwrap_or(0.0);
        let end_fraction = self
            .fractions
            .get((segment_index + 1).min(last))
            .copied()
            .unwrap_or(1.0);

        let duration = self.segment_duration(segment_index);
        let progress = ((elapsed_ms - segment_start).max(0.0) / duration).min(1.0);
        let fraction = start_fraction + (end_fraction - start_fraction) * progress;

        let best_px = track.px(fraction);
        let rider_px = best_px + self.anchor.offset_px;

        DuelFrame {
            segment_index,
            progress,
            fraction,
            offset_px: self.anchor.offset_px,
            best_px,
            rider_px,
            best_percent: track.percent(best_px),
            rider_percent: track.percent(rider_px),
        }
    }

    /// Expected duration of a segment from the pacing line.
    fn segment_duration(&self, segment_index: usize) -> f64 {
        let default = self.settings.default_segment_ms;
        let t_start = if segment_index == 0 {
            0.0
        } else {
            self.best_times
                .get(segment_index - 1)
                .copied()
                .flatten()
                .unwrap_or(0.0)
        };
        let t_end = self
            .best_times
            .get(segment_index)
            .copied()
            .flatten()
            .unwrap_or(t_start + default);

        let span = t_end - t_start;
        let span = if span == 0.0 || span.is_nan() {
            default
        } else {
            span
        };
        span.max(self.settings.min_segment_ms)
    }
}
