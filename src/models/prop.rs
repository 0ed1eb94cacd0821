use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database row for the player_props table. A (player, stat, line) triple
/// tied to one game.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlayerProp {
    pub id: i64,
    pub game_id: i64,
    pub player_name: String,
    pub prop_type: String,
    pub line: Decimal,
    /// American odds, e.g. -110.
    pub over_odds: i32,
    pub under_odds: i32,
    pub bookmaker: String,
    pub updated_at: DateTime<Utc>,
}
