//! SplitRide - Checkpoint Split Timer for Cycling Routes
//!
//! Times rides against ordered route checkpoints, ranks every split against
//! previously saved rides, and animates a ghost duel against the best ride.
//! Routes and rides are kept in a local SQLite database.

pub mod duel;
pub mod leaderboards;
pub mod recording;
pub mod routes;
pub mod storage;

// Re-export commonly used types
pub use duel::DuelSimulator;
pub use recording::{RideDesk, RideSession};
pub use routes::{Checkpoint, Route};
pub use storage::config::AppConfig;
pub use storage::database::Database;
