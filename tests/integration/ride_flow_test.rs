//! Integration tests for a timed ride against history.
//!
//! Tests the flow from start through marks, undo and save.

use splitride::leaderboards::RankChange;
use splitride::recording::{ManualClock, Mark, Ride, RideDesk, RideEvent};
use splitride::routes::Route;
use splitride::storage::config::DuelSettings;

fn route() -> Route {
    Route::new("Three Points")
        .with_checkpoint("Start", None)
        .with_checkpoint("Climb", None)
        .with_checkpoint("Finish", None)
}

fn history(route: &Route) -> Vec<Ride> {
    let marks = vec![
        Mark {
            checkpoint_id: route.checkpoints[0].id,
            elapsed_ms: 1_000.0,
        },
        Mark {
            checkpoint_id: route.checkpoints[1].id,
            elapsed_ms: 2_500.0,
        },
    ];
    vec![Ride::new(route.id, 4_000.0, marks)]
}

fn checkpoint(events: &[RideEvent]) -> &splitride::recording::CheckpointFeedback {
    match &events[0] {
        RideEvent::CheckpointReached(cp) => cp,
        other => panic!("expected checkpoint event, got {other:?}"),
    }
}

#[test]
fn test_marks_ranked_against_history() {
    let route = route();
    let rides = history(&route);
    let clock = ManualClock::new(0.0);
    let mut desk = RideDesk::new(&clock, DuelSettings::default());
    let id = desk.start(&route, &rides).unwrap();

    clock.set(1_200.0);
    let events = desk.mark_next_checkpoint(id, &rides).unwrap();
    let cp = checkpoint(&events);
    assert_eq!(cp.standing.position, 2);
    assert_eq!(cp.standing.total_count, 2);
    assert_eq!(cp.delta_to_best_ms, Some(200.0));
    assert_eq!(cp.rank_change, None);

    clock.set(2_300.0);
    let events = desk.mark_next_checkpoint(id, &rides).unwrap();
    let cp = checkpoint(&events);
    assert_eq!(cp.standing.position, 1);
    assert_eq!(cp.standing.total_count, 2);
    assert_eq!(cp.delta_to_best_ms, Some(-200.0));
    assert_eq!(cp.rank_change, Some(RankChange::Improved));
    assert_eq!(cp.split_ms, 1_100.0);
}

#[test]
fn test_undo_keeps_duel_segment_in_range() {
    let route = route();
    let rides = history(&route);
    let clock = ManualClock::new(0.0);
    let mut desk = RideDesk::new(&clock, DuelSettings::default());
    let id = desk.start(&route, &rides).unwrap();

    clock.set(1_200.0);
    desk.mark_next_checkpoint(id, &rides).unwrap();
    clock.set(2_300.0);
    desk.mark_next_checkpoint(id, &rides).unwrap();

    let removed = desk.undo(id).unwrap().unwrap();
    assert_eq!(removed.elapsed_ms, 2_300.0);

    let session = desk.session().unwrap();
    assert_eq!(session.marks().len(), 1);
    assert_eq!(session.marks()[0].elapsed_ms, 1_200.0);
    assert!(session.is_running());

    let frame = desk.tick(id, &rides, 300.0).unwrap();
    assert_eq!(frame.duel.segment_index, 1);
    assert_eq!(frame.marked, 1);
    assert_eq!(frame.next_checkpoint_name.as_deref(), Some("Climb"));
}

#[test]
fn test_save_produces_ride_for_history() {
    let route = route();
    let mut rides = history(&route);
    let clock = ManualClock::new(0.0);
    let mut desk = RideDesk::new(&clock, DuelSettings::default());
    let id = desk.start(&route, &rides).unwrap();

    for t in [900.0, 2_000.0, 3_500.0] {
        clock.set(t);
        desk.mark_next_checkpoint(id, &rides).unwrap();
    }
    clock.set(3_600.0);
    let (ride, events) = desk.save(id, &rides, Some("Best Day"), None).unwrap();

    let RideEvent::Finished(finish) = &events[0] else {
        panic!("expected finish event");
    };
    assert_eq!(finish.standing.position, 1);
    assert_eq!(finish.delta_to_best_ms, Some(-400.0));
    assert_eq!(ride.total_ms, 3_600.0);
    assert_eq!(ride.marks.len(), 3);

    // The saved ride becomes the pacing line for the next attempt.
    rides.push(ride);
    let id = desk.start(&route, &rides).unwrap();
    let frame = desk.tick(id, &rides, 300.0).unwrap();
    assert_eq!(frame.comparison.finish_best_ms, Some(3_600.0));
    assert_eq!(frame.comparison.finish_target.unwrap().rank, 1);
}

#[test]
fn test_undo_and_remark_through_desk() {
    let route = route();
    let rides = history(&route);
    let clock = ManualClock::new(0.0);
    let mut desk = RideDesk::new(&clock, DuelSettings::default());
    let id = desk.start(&route, &rides).unwrap();

    clock.set(1_200.0);
    desk.mark_next_checkpoint(id, &rides).unwrap();
    clock.set(2_300.0);
    desk.mark_next_checkpoint(id, &rides).unwrap();
    desk.undo(id).unwrap();

    clock.set(2_700.0);
    let events = desk.mark_next_checkpoint(id, &rides).unwrap();
    let cp = checkpoint(&events);
    assert_eq!(cp.checkpoint_index, 1);
    assert_eq!(cp.standing.position, 2);
    assert_eq!(cp.rank_change, Some(RankChange::Held));
    assert_eq!(cp.split_ms, 1_500.0);

    let anchor = desk.session().unwrap().duel_anchor();
    assert_eq!(anchor.segment_index, 1);
    assert_eq!(anchor.segment_start_elapsed_ms, 2_700.0);
}
