pub mod engine;
pub mod scoring;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use engine::{compute_standings, validate_match, Standings};
pub use scoring::{tally_match, MatchTally, Side};

/// Longest streak of results kept per player
pub const RECENT_RESULTS_LIMIT: usize = 5;

/// Outcome of a decided match from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
}

/// Derived leaderboard line for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub name: String,
    pub points: u32,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    /// Most recent first, at most [`RECENT_RESULTS_LIMIT`] entries
    pub recent_results: Vec<MatchResult>,
}

impl StandingsRow {
    pub fn new(name: impl Into<String>) -> Self {
        StandingsRow {
            name: name.into(),
            points: 0,
            matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            recent_results: Vec::new(),
        }
    }

    /// Put `result` at the front of the streak, dropping the oldest beyond the limit.
    pub fn push_recent(&mut self, result: MatchResult) {
        self.recent_results.insert(0, result);
        self.recent_results.truncate(RECENT_RESULTS_LIMIT);
    }
}

/// A match that cannot be scored because its two players aren't two distinct names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMatchError {
    #[error("match has no name for {0}")]
    MissingPlayer(&'static str),
    #[error("'{0}' cannot play a match against themselves")]
    SamePlayer(String),
}
