use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use metrics::counter;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// GAME_STATUS_ID value for a finished game.
pub const GAME_STATUS_FINAL: i64 = 3;

#[derive(Debug, Error)]
pub enum StatsClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Raw stats.nba.com response envelope. Every endpoint returns one or more
/// tabular result sets (column headers + row arrays).
#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    fn column(&self, header: &str) -> Result<usize, StatsClientError> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| StatsClientError::Unexpected(format!("missing column {header}")))
    }
}

impl StatsResponse {
    /// Pick a result set by name, falling back to the first one. The API
    /// keeps names stable but not their order.
    fn result_set(&self, name: &str) -> Result<&ResultSet, StatsClientError> {
        self.result_sets
            .iter()
            .find(|rs| rs.name == name)
            .or_else(|| self.result_sets.first())
            .ok_or_else(|| StatsClientError::Unexpected("empty resultSets".into()))
    }
}

fn cell_str(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_i64(row: &[Value], idx: usize) -> Option<i64> {
    match row.get(idx) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn cell_decimal(row: &[Value], idx: usize) -> Option<Decimal> {
    match row.get(idx) {
        Some(Value::Number(n)) => n.as_f64().and_then(Decimal::from_f64),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ScheduledGame {
    pub external_id: String,
    pub commence_time: DateTime<Utc>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub status_id: i64,
}

impl ScheduledGame {
    pub fn is_final(&self) -> bool {
        self.status_id == GAME_STATUS_FINAL
    }
}

/// One player's observed line from a boxscore. Missing stats read as zero,
/// matching how the boxscore reports DNP rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerLine {
    pub points: Decimal,
    pub rebounds: Decimal,
    pub assists: Decimal,
}

impl PlayerLine {
    pub fn stat(&self, kind: crate::models::PropKind) -> Decimal {
        match kind {
            crate::models::PropKind::Points => self.points,
            crate::models::PropKind::Rebounds => self.rebounds,
            crate::models::PropKind::Assists => self.assists,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RosterPlayer {
    pub player_id: i64,
    pub player_name: String,
}

/// One game from a player's game log; stats absent or unparsable are None so
/// the projection can skip them.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameLogLine {
    pub points: Option<Decimal>,
    pub rebounds: Option<Decimal>,
    pub assists: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct StatsClient {
    http: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    /// The endpoint rejects requests that don't look like they come from a
    /// browser on nba.com.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<StatsResponse, StatsClientError> {
        counter!("stats_requests_total").increment(1);

        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(params)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .header("Accept", "application/json")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Referer", "https://www.nba.com/")
            .header("Origin", "https://www.nba.com")
            .send()
            .await?
            .error_for_status()?;

        let body: StatsResponse = resp.json().await?;
        Ok(body)
    }

    /// Fetch the scoreboard for one calendar day.
    pub async fn scoreboard(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>, StatsClientError> {
        let body = self
            .get(
                "scoreboardv2",
                &[
                    ("GameDate", date.format("%Y-%m-%d").to_string()),
                    ("LeagueID", "00".into()),
                    ("DayOffset", "0".into()),
                ],
            )
            .await?;

        let header = body.result_set("GameHeader")?;
        let id_col = header.column("GAME_ID")?;
        let date_col = header.column("GAME_DATE_EST")?;
        let home_col = header.column("HOME_TEAM_ID")?;
        let away_col = header.column("VISITOR_TEAM_ID")?;
        let status_col = header.column("GAME_STATUS_ID")?;

        let mut games = Vec::with_capacity(header.row_set.len());
        for row in &header.row_set {
            let Some(external_id) = cell_str(row, id_col) else {
                continue;
            };
            let Some(date_raw) = cell_str(row, date_col) else {
                continue;
            };
            let commence_time = NaiveDateTime::parse_from_str(&date_raw, "%Y-%m-%dT%H:%M:%S")
                .map_err(|e| StatsClientError::Unexpected(format!("bad GAME_DATE_EST: {e}")))?
                .and_utc();

            games.push(ScheduledGame {
                external_id,
                commence_time,
                home_team_id: cell_i64(row, home_col).unwrap_or_default(),
                away_team_id: cell_i64(row, away_col).unwrap_or_default(),
                status_id: cell_i64(row, status_col).unwrap_or_default(),
            });
        }

        Ok(games)
    }

    /// Current status id for a game (3 = final).
    pub async fn game_status(&self, external_id: &str) -> Result<i64, StatsClientError> {
        let body = self
            .get("boxscoresummaryv2", &[("GameID", external_id.to_string())])
            .await?;

        let summary = body.result_set("GameSummary")?;
        let status_col = summary.column("GAME_STATUS_ID")?;
        let row = summary
            .row_set
            .first()
            .ok_or_else(|| StatsClientError::Unexpected("empty GameSummary".into()))?;

        cell_i64(row, status_col)
            .ok_or_else(|| StatsClientError::Unexpected("missing GAME_STATUS_ID".into()))
    }

    /// Observed player stat lines for a completed game, keyed by player name.
    pub async fn boxscore(
        &self,
        external_id: &str,
    ) -> Result<HashMap<String, PlayerLine>, StatsClientError> {
        let body = self
            .get(
                "boxscoretraditionalv2",
                &[
                    ("GameID", external_id.to_string()),
                    ("StartPeriod", "0".into()),
                    ("EndPeriod", "10".into()),
                    ("StartRange", "0".into()),
                    ("EndRange", "28800".into()),
                    ("RangeType", "0".into()),
                ],
            )
            .await?;

        let stats = body.result_set("PlayerStats")?;
        let name_col = stats.column("PLAYER_NAME")?;
        let pts_col = stats.column("PTS")?;
        let reb_col = stats.column("REB")?;
        let ast_col = stats.column("AST")?;

        let mut lines = HashMap::with_capacity(stats.row_set.len());
        for row in &stats.row_set {
            let Some(name) = cell_str(row, name_col) else {
                continue;
            };
            lines.insert(
                name,
                PlayerLine {
                    points: cell_decimal(row, pts_col).unwrap_or_default(),
                    rebounds: cell_decimal(row, reb_col).unwrap_or_default(),
                    assists: cell_decimal(row, ast_col).unwrap_or_default(),
                },
            );
        }

        Ok(lines)
    }

    /// Current roster for a team.
    pub async fn team_roster(
        &self,
        team_id: i64,
        season: &str,
    ) -> Result<Vec<RosterPlayer>, StatsClientError> {
        let body = self
            .get(
                "commonteamroster",
                &[
                    ("TeamID", team_id.to_string()),
                    ("Season", season.to_string()),
                    ("LeagueID", "00".into()),
                ],
            )
            .await?;

        let roster = body.result_set("CommonTeamRoster")?;
        let id_col = roster.column("PLAYER_ID")?;
        let name_col = roster.column("PLAYER")?;

        let players = roster
            .row_set
            .iter()
            .filter_map(|row| {
                Some(RosterPlayer {
                    player_id: cell_i64(row, id_col)?,
                    player_name: cell_str(row, name_col)?,
                })
            })
            .collect();

        Ok(players)
    }

    /// A player's most recent regular-season games, newest first, capped at
    /// `limit` entries.
    pub async fn player_game_log(
        &self,
        player_id: i64,
        season: &str,
        limit: usize,
    ) -> Result<Vec<GameLogLine>, StatsClientError> {
        let body = self
            .get(
                "playergamelog",
                &[
                    ("PlayerID", player_id.to_string()),
                    ("Season", season.to_string()),
                    ("SeasonType", "Regular Season".into()),
                    ("LeagueID", "00".into()),
                ],
            )
            .await?;

        let log = body.result_set("PlayerGameLog")?;
        let pts_col = log.column("PTS")?;
        let reb_col = log.column("REB")?;
        let ast_col = log.column("AST")?;

        let lines = log
            .row_set
            .iter()
            .take(limit)
            .map(|row| GameLogLine {
                points: cell_decimal(row, pts_col),
                rebounds: cell_decimal(row, reb_col),
                assists: cell_decimal(row, ast_col),
            })
            .collect();

        Ok(lines)
    }
}
