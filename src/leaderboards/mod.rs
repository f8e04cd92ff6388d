//! Leaderboards and standings.
//!
//! Rankings against historical rides, display boards and formatting helpers.

pub mod boards;
pub mod format;
pub mod rankings;

pub use boards::{history_board, CheckpointBoard, HistoryEntry, HistoryFilter, RouteBoards};
pub use rankings::{
    checkpoint_leaderboard, delta_to_best, finish_leaderboard, pick_pacing_target, rank,
    LeaderboardRow, LiveComparison, PacingTarget, RankChange, Standing,
};
