//! Unit tests for the ride session state machine

use splitride::recording::{
    ManualClock, Mark, Ride, RideDesk, RideError, RideEvent, RideSession, RideStatus,
};
use splitride::routes::Route;
use splitride::storage::config::DuelSettings;

fn route() -> Route {
    Route::new("Session")
        .with_checkpoint("Start", None)
        .with_checkpoint("Mid", None)
        .with_checkpoint("Finish", None)
}

#[test]
fn test_marks_are_monotonic() {
    let route = route();
    let mut session = RideSession::start(&route, &[], 0.0, DuelSettings::default()).unwrap();

    session.mark_next_checkpoint(1_000.0, &[]).unwrap();
    session.mark_next_checkpoint(1_000.0, &[]).unwrap();
    session.mark_next_checkpoint(2_500.0, &[]).unwrap();

    let times: Vec<f64> = session.marks().iter().map(|m| m.elapsed_ms).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        session.marks()[2].checkpoint_id,
        route.checkpoints[2].id
    );
}

#[test]
fn test_stop_with_history_reports_finish_rank() {
    let route = route();
    let history = vec![Ride::new(route.id, 4_000.0, Vec::new())];
    let mut session = RideSession::start(&route, &history, 0.0, DuelSettings::default()).unwrap();

    let events = session.stop(4_500.0, &history);
    let RideEvent::Finished(finish) = &events[0] else {
        panic!("expected finish event");
    };
    assert_eq!(finish.standing.position, 2);
    assert_eq!(finish.standing.total_count, 2);
    assert_eq!(finish.delta_to_best_ms, Some(500.0));
}

#[test]
fn test_undo_then_remark_same_checkpoint() {
    let route = route();
    let mut session = RideSession::start(&route, &[], 0.0, DuelSettings::default()).unwrap();

    session.mark_next_checkpoint(1_000.0, &[]).unwrap();
    let removed: Option<Mark> = session.undo();
    assert_eq!(removed.map(|m| m.elapsed_ms), Some(1_000.0));

    let events = session.mark_next_checkpoint(1_400.0, &[]).unwrap();
    let RideEvent::CheckpointReached(cp) = &events[0] else {
        panic!("expected checkpoint event");
    };
    assert_eq!(cp.checkpoint_index, 0);
    assert_eq!(cp.checkpoint_name, "Start");
}

#[test]
fn test_desk_drives_session_with_clock() {
    let clock = ManualClock::new(50_000.0);
    let mut desk = RideDesk::new(&clock, DuelSettings::default());
    let route = route();

    let id = desk.start(&route, &[]).unwrap();
    clock.advance(1_000.0);
    desk.mark_next_checkpoint(id, &[]).unwrap();
    clock.advance(2_000.0);
    desk.stop(id, &[]).unwrap();

    let session = desk.session().unwrap();
    assert_eq!(session.status(), RideStatus::Stopped);
    assert_eq!(session.marks()[0].elapsed_ms, 1_000.0);
    assert_eq!(session.stopped_elapsed_ms(), Some(3_000.0));

    assert_eq!(
        desk.mark_next_checkpoint(id, &[]),
        Err(RideError::NotRunning)
    );
}

#[test]
fn test_discard_frees_desk() {
    let clock = ManualClock::new(0.0);
    let mut desk = RideDesk::new(&clock, DuelSettings::default());
    let route = route();

    let id = desk.start(&route, &[]).unwrap();
    desk.discard(id).unwrap();
    assert!(desk.start(&route, &[]).is_ok());
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

fn rank_change_of(events: &[RideEvent]) -> (Option<splitride::leaderboards::RankChange>, u32) {
    match &events[0] {
        RideEvent::CheckpointReached(cp) => (cp.rank_change, cp.standing.position),
        other => panic!("expected checkpoint event, got {other:?}"),
    }
}

#[test]
fn test_remark_first_checkpoint_after_undo_has_no_rank_change() {
    let route = route();
    let rides = history(&route);
    let mut session = RideSession::start(&route, &rides, 0.0, DuelSettings::default()).unwrap();

    session.mark_next_checkpoint(1_200.0, &rides).unwrap();
    session.undo();

    let events = session.mark_next_checkpoint(900.0, &rides).unwrap();
    assert_eq!(rank_change_of(&events), (None, 1));
}

#[test]
fn test_remark_second_checkpoint_compares_with_first() {
    use splitride::leaderboards::RankChange;

    let route = route();
    let rides = history(&route);
    let mut session = RideSession::start(&route, &rides, 0.0, DuelSettings::default()).unwrap();

    let events = session.mark_next_checkpoint(900.0, &rides).unwrap();
    assert_eq!(rank_change_of(&events), (None, 1));
    let events = session.mark_next_checkpoint(3_000.0, &rides).unwrap();
    assert_eq!(rank_change_of(&events), (Some(RankChange::Dropped), 2));

    session.undo();
    assert_eq!(session.last_rank_at_checkpoint(), Some(1));

    let events = session.mark_next_checkpoint(3_100.0, &rides).unwrap();
    assert_eq!(rank_change_of(&events), (Some(RankChange::Dropped), 2));
}

#[test]
fn test_remark_reanchors_duel() {
    let route = route();
    let rides = history(&route);
    let mut session = RideSession::start(&route, &rides, 0.0, DuelSettings::default()).unwrap();

    session.mark_next_checkpoint(1_000.0, &rides).unwrap();
    session.mark_next_checkpoint(14_500.0, &rides).unwrap();
    assert_eq!(session.duel_anchor().offset_px, -20.0);

    session.undo();
    session.mark_next_checkpoint(3_000.0, &rides).unwrap();

    let anchor = session.duel_anchor();
    assert_eq!(anchor.segment_index, 1);
    assert_eq!(anchor.segment_start_elapsed_ms, 3_000.0);
    assert_eq!(anchor.offset_px, 0.0);
}
