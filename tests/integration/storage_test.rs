//! Integration tests for the ride database on disk.

use splitride::recording::{ManualClock, RideDesk};
use splitride::storage::config::{load_config_from, save_config_to, AppConfig};
use splitride::storage::database::Database;

#[test]
fn test_saved_ride_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("splitride.db");

    let (route, ride_id) = {
        let mut db = Database::open(&path).unwrap();
        let route = db.seed_example_route().unwrap().expect("fresh database is seeded");

        let clock = ManualClock::new(0.0);
        let mut desk = RideDesk::new(&clock, Default::default());
        let id = desk.start(&route, &[]).unwrap();
        for t in [0.0, 600_000.0, 1_500_000.0] {
            clock.set(t);
            desk.mark_next_checkpoint(id, &[]).unwrap();
        }
        clock.set(1_800_000.0);
        let (ride, _) = desk.save(id, &[], Some("Morning"), Some("tailwind")).unwrap();
        db.insert_ride(&ride).unwrap();
        (route, ride.id)
    };

    let db = Database::open(&path).unwrap();
    let routes = db.list_routes().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0], route);

    let rides = db.list_rides_for_route(&route.id).unwrap();
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0].id, ride_id);
    assert_eq!(rides[0].marks.len(), 3);
    assert_eq!(rides[0].marks[2].checkpoint_id, route.checkpoints[2].id);
    assert_eq!(rides[0].note.as_deref(), Some("tailwind"));
}

#[test]
fn test_config_drives_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    let mut config = AppConfig::default();
    config.duel.step_ms = 2_000.0;
    save_config_to(&config, &config_path).unwrap();

    let loaded = load_config_from(&config_path, dir.path().to_path_buf()).unwrap();
    assert_eq!(loaded.duel.step_ms, 2_000.0);
    assert_eq!(loaded.database_path(), dir.path().join("splitride.db"));

    let db = Database::open(&loaded.database_path()).unwrap();
    assert_eq!(db.count_routes().unwrap(), 0);
}
