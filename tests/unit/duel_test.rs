//! Unit tests for the ghost duel

use splitride::duel::{
    best_cumulative_times, checkpoint_fractions, quantized_offset, DuelSimulator, TrackGeometry,
};
use splitride::recording::{Mark, Ride};
use splitride::routes::Route;
use splitride::storage::config::DuelSettings;

fn route() -> Route {
    Route::new("Duel")
        .with_checkpoint("Start", None)
        .with_checkpoint("Mid", None)
        .with_checkpoint("Finish", None)
}

fn ride(route: &Route, marks: &[f64], total_ms: f64) -> Ride {
    let marks = marks
        .iter()
        .zip(&route.checkpoints)
        .map(|(&elapsed_ms, cp)| Mark {
            checkpoint_id: cp.id,
            elapsed_ms,
        })
        .collect();
    Ride::new(route.id, total_ms, marks)
}

fn mark(route: &Route, index: usize, elapsed_ms: f64) -> Mark {
    Mark {
        checkpoint_id: route.checkpoints[index].id,
        elapsed_ms,
    }
}

#[test]
fn test_quantized_offset_steps() {
    let settings = DuelSettings::default();
    assert_eq!(quantized_offset(12_000.0, &settings), -20.0);
    assert_eq!(quantized_offset(-12_000.0, &settings), 20.0);
    assert_eq!(quantized_offset(4_000.0, &settings), 0.0);
    assert_eq!(quantized_offset(5_000.0, &settings), -10.0);
    assert_eq!(quantized_offset(0.0, &settings), 0.0);
}

#[test]
fn test_uniform_fractions_without_distances() {
    let fractions = checkpoint_fractions(&route());
    assert_eq!(fractions, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_fractions_clamped_to_total() {
    let route = Route::new("Long")
        .with_distance(10.0)
        .with_checkpoint("Start", Some(0.0))
        .with_checkpoint("Past", Some(12.0));
    assert_eq!(checkpoint_fractions(&route), vec![0.0, 1.0]);
}

#[test]
fn test_best_times_mix_rides() {
    let route = route();
    let rides = vec![
        // Fastest finish but no mid mark
        ride(&route, &[0.0], 100_000.0),
        ride(&route, &[0.0, 40_000.0], 120_000.0),
    ];

    let times = best_cumulative_times(&route, &rides);
    assert_eq!(times, vec![Some(0.0), Some(40_000.0), Some(100_000.0)]);
}

#[test]
fn test_frame_interpolates_with_offset() {
    let route = route();
    let rides = vec![ride(&route, &[0.0, 60_000.0, 120_000.0], 120_000.0)];
    let mut duel = DuelSimulator::new(&route, &rides, DuelSettings::default());

    duel.on_checkpoint(0, 0.0);
    let delta = duel.on_checkpoint(1, 72_000.0);
    assert_eq!(delta, Some(12_000.0));

    let marks = vec![mark(&route, 0, 0.0), mark(&route, 1, 72_000.0)];
    let frame = duel.frame(102_000.0, &marks, 228.0);

    assert_eq!(frame.segment_index, 1);
    assert_eq!(frame.progress, 0.5);
    assert_eq!(frame.fraction, 0.75);
    assert_eq!(frame.offset_px, -20.0);
    assert_eq!(frame.best_px, 164.0);
    assert_eq!(frame.rider_px, 144.0);
}

#[test]
fn test_frame_progress_saturates() {
    let route = route();
    let rides = vec![ride(&route, &[0.0, 60_000.0, 120_000.0], 120_000.0)];
    let duel = DuelSimulator::new(&route, &rides, DuelSettings::default());

    let frame = duel.frame(600_000.0, &[], 228.0);
    assert_eq!(frame.segment_index, 0);
    assert_eq!(frame.progress, 1.0);
    assert_eq!(frame.fraction, 0.5);
}

#[test]
fn test_no_history_uses_default_segment() {
    let route = route();
    let mut duel = DuelSimulator::new(&route, &[], DuelSettings::default());

    assert_eq!(duel.on_checkpoint(0, 1_000.0), None);
    let frame = duel.frame(30_000.0, &[mark(&route, 0, 1_000.0)], 228.0);
    assert_eq!(frame.segment_index, 0);
    assert_eq!(frame.progress, 0.5);
    assert_eq!(frame.offset_px, 0.0);
}

#[test]
fn test_track_geometry() {
    let track = TrackGeometry::new(228.0, 14.0);
    assert_eq!(track.px(0.0), 14.0);
    assert_eq!(track.px(1.0), 214.0);
    assert_eq!(track.px(2.0), 214.0);
    assert_eq!(TrackGeometry::new(0.0, 0.0).percent(10.0), 0.0);
}
