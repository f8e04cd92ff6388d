//! Ghost duel against the best recorded ride.

pub mod simulator;
pub mod track;

pub use simulator::{quantized_offset, DuelAnchor, DuelFrame, DuelSimulator};
pub use track::{best_cumulative_times, best_ride, checkpoint_fractions, TrackGeometry};

use crate::routes::Route;

/// A checkpoint tick on the duel track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMark {
    /// START, CP{n} or FINISH
    pub label: String,
    /// Position along the track (0..1)
    pub fraction: f64,
}

/// Checkpoint ticks for drawing the track.
pub fn track_marks(route: &Route) -> Vec<TrackMark> {
    checkpoint_fractions(route)
        .into_iter()
        .enumerate()
        .map(|(i, fraction)| TrackMark {
            label: route.track_label(i),
            fraction,
        })
        .collect()
}
