use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Outcome, Side};

/// Database row for the picks table.
///
/// `result` / `actual_value` / `graded_at` start NULL and are written exactly
/// once by the grading engine; the settle query guards on `result IS NULL` so
/// a graded pick can never be overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pick {
    pub id: i64,
    pub prop_id: i64,
    pub user_id: String,
    pub selection: String,
    pub line: Decimal,
    pub result: Option<String>,
    pub actual_value: Option<Decimal>,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Pending-vs-decided view over the nullable grading columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeState {
    Pending,
    Decided {
        outcome: Outcome,
        actual: Decimal,
        graded_at: DateTime<Utc>,
    },
}

impl Pick {
    pub fn side(&self) -> Option<Side> {
        Side::from_str(&self.selection)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.result.as_deref().and_then(Outcome::from_str)
    }

    pub fn state(&self) -> GradeState {
        match (self.outcome(), self.actual_value, self.graded_at) {
            (Some(outcome), Some(actual), Some(graded_at)) => GradeState::Decided {
                outcome,
                actual,
                graded_at,
            },
            _ => GradeState::Pending,
        }
    }

    pub fn is_graded(&self) -> bool {
        self.result.is_some()
    }
}

/// Pick joined with its prop and game, as returned by the history and
/// grading queries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PickDetail {
    pub id: i64,
    pub prop_id: i64,
    pub user_id: String,
    pub player_name: String,
    pub prop_type: String,
    pub selection: String,
    pub line: Decimal,
    pub result: Option<String>,
    pub actual_value: Option<Decimal>,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub game_id: i64,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
}
