//! Database operations using rusqlite.
//!
//! Stores routes with their ordered checkpoints and saved rides with their
//! marks. Positions are stored explicitly so ordering survives round trips.

use crate::recording::types::{Mark, Ride};
use crate::routes::{Checkpoint, Route};
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    // ========== Route Operations ==========

    /// Insert a route together with its checkpoints.
    pub fn insert_route(&mut self, route: &Route) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute(
            "INSERT INTO routes (id, name, source, total_distance_km, total_ascent_m, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                route.id.to_string(),
                route.name,
                route.source,
                route.total_distance_km,
                route.total_ascent_m,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(map_write_error)?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO checkpoints (id, route_id, position, name, distance_km)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            for (position, cp) in route.checkpoints.iter().enumerate() {
                stmt.execute(params![
                    cp.id.to_string(),
                    route.id.to_string(),
                    position as i64,
                    cp.name,
                    cp.distance_km,
                ])
                .map_err(map_write_error)?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::debug!("Inserted route {} '{}'", route.id, route.name);
        Ok(())
    }

    /// Get a route by ID.
    pub fn get_route(&self, id: &Uuid) -> Result<Option<Route>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, name, source, total_distance_km, total_ascent_m
             FROM routes WHERE id = ?1",
            params![id.to_string()],
            RouteRow::from_row,
        );

        match result {
            Ok(row) => Ok(Some(self.hydrate_route(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// List all routes, ordered by name.
    pub fn list_routes(&self) -> Result<Vec<Route>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, source, total_distance_km, total_ascent_m
                 FROM routes ORDER BY name",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], RouteRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut routes = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            routes.push(self.hydrate_route(row)?);
        }

        Ok(routes)
    }

    /// Delete a route by ID (cascades to checkpoints and rides).
    pub fn delete_route(&self, id: &Uuid) -> Result<(), DatabaseError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM routes WHERE id = ?1", params![id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("Route {}", id)));
        }

        Ok(())
    }

    /// Count routes.
    pub fn count_routes(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as usize)
    }

    /// Insert the example route when the database has no routes yet.
    ///
    /// Returns the seeded route, if any.
    pub fn seed_example_route(&mut self) -> Result<Option<Route>, DatabaseError> {
        if self.count_routes()? > 0 {
            return Ok(None);
        }

        let mut route = Route::new("Alpská Výzva")
            .with_source("Zwift")
            .with_distance(25.6)
            .with_checkpoint("Start", Some(0.0))
            .with_checkpoint("Stoupání", Some(5.2))
            .with_checkpoint("Vrchol", Some(12.8))
            .with_checkpoint("Sjezd", Some(18.0))
            .with_checkpoint("Cíl", Some(25.6));
        route.total_ascent_m = Some(840.0);

        self.insert_route(&route)?;
        tracing::info!("Seeded example route '{}'", route.name);
        Ok(Some(route))
    }

    fn hydrate_route(&self, row: RouteRow) -> Result<Route, DatabaseError> {
        let id = parse_uuid(&row.id, "route")?;

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, distance_km FROM checkpoints
                 WHERE route_id = ?1 ORDER BY position",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![row.id], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<f64>>(2)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut checkpoints = Vec::new();
        for r in rows {
            let (cp_id, name, distance_km) =
                r.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            checkpoints.push(Checkpoint {
                id: parse_uuid(&cp_id, "checkpoint")?,
                name,
                distance_km,
            });
        }

        Ok(Route {
            id,
            name: row.name,
            source: row.source,
            total_distance_km: row.total_distance_km,
            total_ascent_m: row.total_ascent_m,
            checkpoints,
        })
    }

    // ========== Ride Operations ==========

    /// Insert a saved ride with its marks.
    pub fn insert_ride(&mut self, ride: &Ride) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute(
            "INSERT INTO rides (id, route_id, date, total_ms, runner_name, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                ride.id.to_string(),
                ride.route_id.to_string(),
                ride.date.to_rfc3339(),
                ride.total_ms,
                ride.runner_name,
                ride.note,
            ],
        )
        .map_err(map_write_error)?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO ride_marks (ride_id, position, checkpoint_id, elapsed_ms)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            for (position, mark) in ride.marks.iter().enumerate() {
                stmt.execute(params![
                    ride.id.to_string(),
                    position as i64,
                    mark.checkpoint_id.to_string(),
                    mark.elapsed_ms,
                ])
                .map_err(map_write_error)?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::info!("Saved ride {} with {} marks", ride.id, ride.marks.len());
        Ok(())
    }

    /// Get a ride by ID.
    pub fn get_ride(&self, id: &Uuid) -> Result<Option<Ride>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, route_id, date, total_ms, runner_name, note FROM rides WHERE id = ?1",
            params![id.to_string()],
            RideRow::from_row,
        );

        match result {
            Ok(row) => Ok(Some(self.hydrate_ride(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// List rides on a route, newest first.
    pub fn list_rides_for_route(&self, route_id: &Uuid) -> Result<Vec<Ride>, DatabaseError> {
        self.query_rides(
            "SELECT id, route_id, date, total_ms, runner_name, note FROM rides
             WHERE route_id = ?1 ORDER BY date DESC",
            params![route_id.to_string()],
        )
    }

    /// List all rides, newest first.
    pub fn list_rides(&self) -> Result<Vec<Ride>, DatabaseError> {
        self.query_rides(
            "SELECT id, route_id, date, total_ms, runner_name, note FROM rides ORDER BY date DESC",
            [],
        )
    }

    /// Delete a ride by ID (cascades to marks).
    pub fn delete_ride(&self, id: &Uuid) -> Result<(), DatabaseError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM rides WHERE id = ?1", params![id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("Ride {}", id)));
        }

        Ok(())
    }

    /// Count rides on a route.
    pub fn count_rides(&self, route_id: &Uuid) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM rides WHERE route_id = ?1",
                params![route_id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as usize)
    }

    fn query_rides<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Ride>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params, RideRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rides = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            rides.push(self.hydrate_ride(row)?);
        }

        Ok(rides)
    }

    fn hydrate_ride(&self, row: RideRow) -> Result<Ride, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT checkpoint_id, elapsed_ms FROM ride_marks
                 WHERE ride_id = ?1 ORDER BY position",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![row.id], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, f64>(1)?))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut marks = Vec::new();
        for r in rows {
            let (checkpoint_id, elapsed_ms) =
                r.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            marks.push(Mark {
                checkpoint_id: parse_uuid(&checkpoint_id, "checkpoint")?,
                elapsed_ms,
            });
        }

        row.into_ride(marks)
    }
}

/// Intermediate struct for reading route rows from database.
struct RouteRow {
    id: String,
    name: String,
    source: Option<String>,
    total_distance_km: Option<f64>,
    total_ascent_m: Option<f64>,
}

impl RouteRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            source: row.get(2)?,
            total_distance_km: row.get(3)?,
            total_ascent_m: row.get(4)?,
        })
    }
}

/// Intermediate struct for reading ride rows from database.
struct RideRow {
    id: String,
    route_id: String,
    date: String,
    total_ms: f64,
    runner_name: Option<String>,
    note: Option<String>,
}

impl RideRow {
    fn from_row(row: &rusqlite::Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            route_id: row.get(1)?,
            date: row.get(2)?,
            total_ms: row.get(3)?,
            runner_name: row.get(4)?,
            note: row.get(5)?,
        })
    }

    fn into_ride(self, marks: Vec<Mark>) -> Result<Ride, DatabaseError> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid ride date: {}", e)))?;

        Ok(Ride {
            id: parse_uuid(&self.id, "ride")?,
            route_id: parse_uuid(&self.route_id, "route")?,
            date,
            total_ms: self.total_ms,
            marks,
            runner_name: self.runner_name,
            note: self.note,
        })
    }
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid {} UUID: {}", what, e)))
}

fn map_write_error(e: rusqlite::Error) -> DatabaseError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(e.to_string())
        }
        _ => DatabaseError::QueryFailed(e.to_string()),
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
