use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database row for the games table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i64,
    /// NBA stats game id, e.g. "0022400123".
    pub external_id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    /// Elapsed commence time makes a game a grading candidate; actual
    /// completion is verified against the boxscore summary before settling.
    pub fn has_commenced(&self, now: DateTime<Utc>) -> bool {
        self.commence_time < now
    }
}
