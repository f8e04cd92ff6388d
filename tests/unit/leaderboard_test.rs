//! Unit tests for checkpoint leaderboards and standings

use splitride::leaderboards::boards::{history_board, HistoryFilter, RouteBoards};
use splitride::leaderboards::rankings::{
    checkpoint_leaderboard, delta_to_best, finish_leaderboard, pick_pacing_target, rank,
    RankChange,
};
use splitride::recording::{Mark, Ride};
use splitride::routes::Route;

fn route(name: &str) -> Route {
    Route::new(name)
        .with_source("Zwift")
        .with_checkpoint("Start", None)
        .with_checkpoint("Climb", None)
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

#[test]
fn test_checkpoint_leaderboard_skips_unreached() {
    let route = route("Hill");
    let rides = vec![
        ride(&route, &[0.0, 3000.0], 9000.0),
        ride(&route, &[0.0], 8000.0),
        ride(&route, &[0.0, 2000.0], 7000.0),
    ];

    let rows = checkpoint_leaderboard(&route, &rides, 1);
    let times: Vec<f64> = rows.iter().map(|r| r.elapsed_ms).collect();
    assert_eq!(times, vec![2000.0, 3000.0]);
}

#[test]
fn test_leaderboards_ignore_other_routes() {
    let hill = route("Hill");
    let flat = route("Flat");
    let rides = vec![
        ride(&hill, &[0.0, 1000.0], 5000.0),
        ride(&flat, &[0.0, 500.0], 2000.0),
    ];

    assert_eq!(checkpoint_leaderboard(&hill, &rides, 1).len(), 1);
    assert_eq!(finish_leaderboard(&hill, &rides)[0].elapsed_ms, 5000.0);
}

#[test]
fn test_rank_tie_goes_to_candidate() {
    let route = route("Hill");
    let rides = vec![ride(&route, &[], 4000.0), ride(&route, &[], 5000.0)];
    let rows = finish_leaderboard(&route, &rides);

    let standing = rank(&rows, 4000.0);
    assert_eq!(standing.position, 1);
    assert_eq!(standing.total_count, 3);

    let standing = rank(&rows, 6000.0);
    assert_eq!(standing.position, 3);
}

#[test]
fn test_delta_to_best() {
    let route = route("Hill");
    let rides = vec![ride(&route, &[1000.0], 4000.0)];
    let rows = checkpoint_leaderboard(&route, &rides, 0);

    assert_eq!(delta_to_best(&rows, 1200.0), Some(200.0));
    assert_eq!(delta_to_best(&[], 1200.0), None);
}

#[test]
fn test_pacing_target() {
    let route = route("Hill");
    let rides = vec![
        ride(&route, &[], 4000.0),
        ride(&route, &[], 5000.0),
        ride(&route, &[], 6000.0),
    ];
    let rows = finish_leaderboard(&route, &rides);

    let target = pick_pacing_target(&rows, 4500.0).unwrap();
    assert_eq!(target.rank, 2);
    assert_eq!(target.elapsed_ms, 5000.0);
    assert!(!target.trailing_last);

    let target = pick_pacing_target(&rows, 7000.0).unwrap();
    assert_eq!(target.rank, 3);
    assert!(target.trailing_last);

    assert!(pick_pacing_target(&[], 1.0).is_none());
}

#[test]
fn test_rank_change() {
    assert_eq!(RankChange::between(3, 1), RankChange::Improved);
    assert_eq!(RankChange::between(2, 2), RankChange::Held);
    assert_eq!(RankChange::between(1, 4), RankChange::Dropped);
}

#[test]
fn test_route_boards_include_finish() {
    let route = route("Hill");
    let rides = vec![
        ride(&route, &[0.0, 1000.0, 3000.0], 3000.0).with_details(Some("A".into()), None),
        ride(&route, &[0.0, 900.0, 3100.0], 3100.0).with_details(Some("B".into()), None),
    ];

    let boards = RouteBoards::build(&route, &rides, 5);
    assert_eq!(boards.boards.len(), 4);
    assert_eq!(boards.boards[1].entries[0].runner_name.as_deref(), Some("B"));

    let finish = boards.finish().unwrap();
    assert_eq!(finish.title, "Finish");
    assert_eq!(finish.entries[0].runner_name.as_deref(), Some("A"));
}

#[test]
fn test_history_board_filters_by_source() {
    let zwift = route("Alps");
    let kinomap = Route::new("Lake")
        .with_source("Kinomap")
        .with_checkpoint("Start", None);
    let routes = vec![zwift.clone(), kinomap.clone()];
    let rides = vec![
        ride(&zwift, &[], 9000.0),
        ride(&kinomap, &[], 1000.0),
        ride(&zwift, &[], 8000.0),
    ];

    let filter = HistoryFilter {
        source: Some("Zwift".to_string()),
        limit: 60,
        ..Default::default()
    };
    let entries = history_board(&routes, &rides, &filter);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].ride.total_ms, 8000.0);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[1].route_name.as_deref(), Some("Alps"));

    let filter = HistoryFilter {
        limit: 2,
        ..Default::default()
    };
    let all = history_board(&routes, &rides, &filter);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].route_name.as_deref(), Some("Lake"));
}

#[test]
fn test_default_history_filter_shows_rides() {
    let route = route("Alps");
    let rides: Vec<Ride> = (0..70)
        .map(|i| ride(&route, &[], 1_000.0 + i as f64))
        .collect();

    let entries = history_board(&[route], &rides, &HistoryFilter::default());
    assert_eq!(entries.len(), 60);
    assert_eq!(entries[0].ride.total_ms, 1_000.0);
}
