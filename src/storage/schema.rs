//! Database schema definitions for SplitRide.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Routes table
CREATE TABLE IF NOT EXISTS routes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    source TEXT,
    total_distance_km REAL,
    total_ascent_m REAL,
    created_at TEXT NOT NULL
);

-- Checkpoints table (ordered by position within a route)
CREATE TABLE IF NOT EXISTS checkpoints (
    id TEXT PRIMARY KEY,
    route_id TEXT NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    distance_km REAL,
    UNIQUE(route_id, position)
);

CREATE INDEX IF NOT EXISTS idx_checkpoints_route_id ON checkpoints(route_id);

-- Rides table
CREATE TABLE IF NOT EXISTS rides (
    id TEXT PRIMARY KEY,
    route_id TEXT NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    total_ms REAL NOT NULL,
    runner_name TEXT,
    note TEXT
);

CREATE INDEX IF NOT EXISTS idx_rides_route_id ON rides(route_id);
CREATE INDEX IF NOT EXISTS idx_rides_date ON rides(date);

-- Ride marks table (mark i belongs to checkpoint i)
CREATE TABLE IF NOT EXISTS ride_marks (
    ride_id TEXT NOT NULL REFERENCES rides(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    checkpoint_id TEXT NOT NULL,
    elapsed_ms REAL NOT NULL,
    PRIMARY KEY (ride_id, position)
);
"#;

/// Schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;
