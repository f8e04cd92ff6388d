//! Duel track geometry and the best-ride pacing line.

use crate::leaderboards::rankings::{checkpoint_leaderboard, finish_leaderboard};
use crate::recording::types::Ride;
use crate::routes::Route;

/// Normalized position (0..1) of every checkpoint along the track.
///
/// Checkpoint distances are used when at least one is known, otherwise the
/// checkpoints are spaced evenly.
pub fn checkpoint_fractions(route: &Route) -> Vec<f64> {
    let cps = &route.checkpoints;
    let uniform = |i: usize| i as f64 / (cps.len().saturating_sub(1).max(1)) as f64;

    let distances: Vec<Option<f64>> = cps
        .iter()
        .map(|c| c.distance_km.filter(|d| d.is_finite()))
        .collect();

    let max_distance = distances
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.max(d))));

    let Some(max_distance) = max_distance else {
        return (0..cps.len()).map(uniform).collect();
    };

    let denominator = match route.total_distance_km.filter(|d| d.is_finite() && *d > 0.0) {
        Some(total) => total,
        None if max_distance != 0.0 => max_distance,
        None => 1.0,
    };

    distances
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let v = match d {
                Some(d) => d / denominator,
                None => uniform(i),
            };
            v.clamp(0.0, 1.0)
        })
        .collect()
}

/// The ride with the fastest finish time on this route.
pub fn best_ride<'a>(route: &Route, rides: &'a [Ride]) -> Option<&'a Ride> {
    let best = finish_leaderboard(route, rides).into_iter().next()?;
    rides.iter().find(|r| r.id == best.ride_id)
}

/// Cumulative time of the pacing line at each checkpoint.
///
/// Uses the best-finishing ride's own marks, falling back to each
/// checkpoint's independent best. The finish entry falls back to the best
/// finish time. The result may mix several rides.
pub fn best_cumulative_times(route: &Route, rides: &[Ride]) -> Vec<Option<f64>> {
    let best = best_ride(route, rides);

    let mut times: Vec<Option<f64>> = (0..route.checkpoint_count())
        .map(|i| {
            best.and_then(|ride| ride.elapsed_at(i)).or_else(|| {
                checkpoint_leaderboard(route, rides, i)
                    .first()
                    .map(|row| row.elapsed_ms)
            })
        })
        .collect();

    if let Some(last) = times.last_mut() {
        if last.is_none() {
            *last = finish_leaderboard(route, rides)
                .first()
                .map(|row| row.elapsed_ms);
        }
    }

    times
}

/// Maps normalized fractions onto a track of a caller-supplied pixel width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    /// Total track width in pixels
    pub width_px: f64,
    /// Inset on both ends in pixels
    pub padding_px: f64,
}

impl TrackGeometry {
    /// Create geometry for a track.
    pub fn new(width_px: f64, padding_px: f64) -> Self {
        Self {
            width_px,
            padding_px,
        }
    }

    /// Pixel position of a fraction, clamped to the track.
    pub fn px(&self, fraction: f64) -> f64 {
        let usable = self.width_px - self.padding_px * 2.0;
        self.padding_px + usable * fraction.clamp(0.0, 1.0)
    }

    /// Pixel position as a percentage of the track width.
    pub fn percent(&self, px: f64) -> f64 {
        if self.width_px > 0.0 {
            px / self.width_px * 100.0
        } else {
            0.0
        }
    }
}
