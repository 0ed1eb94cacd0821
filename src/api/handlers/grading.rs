use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{game_repo, pick_repo};
use crate::errors::AppError;
use crate::models::{GradeState, Outcome, PickDetail};
use crate::scoring::record::{format_streak, rank_users, streak, win_rate, Record, UserOutcomes};
use crate::scoring::LeaderboardEntry;
use crate::services::grading::{self, GameGradeReport};
use crate::AppState;

/// Trailing window for records and the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    Overall,
    Week,
    Month,
}

impl Timeframe {
    fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None | Some("overall") => Ok(Timeframe::Overall),
            Some("week") => Ok(Timeframe::Week),
            Some("month") => Ok(Timeframe::Month),
            Some(other) => Err(AppError::BadRequest(format!("Invalid timeframe: {other}"))),
        }
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::Overall => None,
            Timeframe::Week => Some(Utc::now() - Duration::days(7)),
            Timeframe::Month => Some(Utc::now() - Duration::days(30)),
        }
    }
}

pub async fn grade_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<GameGradeReport>, AppError> {
    let game = game_repo::get_game(&state.db, game_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".into()))?;

    let report = grading::grade_game(&state.db, &state.stats, &game).await?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct GradeAllResponse {
    pub message: &'static str,
    pub games_processed: usize,
    pub results: Vec<GameGradeReport>,
}

pub async fn grade_all(
    State(state): State<AppState>,
) -> Result<Json<GradeAllResponse>, AppError> {
    let results =
        grading::grade_all(&state.db, &state.stats, state.config.stats_rate_limit_ms).await?;

    Ok(Json(GradeAllResponse {
        message: "Grading completed",
        games_processed: results.len(),
        results,
    }))
}

#[derive(Deserialize)]
pub struct RecordQuery {
    pub timeframe: Option<String>,
}

#[derive(Serialize)]
pub struct UserRecordResponse {
    pub user_id: String,
    pub record: Record,
    pub total: u32,
    pub win_percentage: Decimal,
    pub streak: String,
    pub pending: i64,
}

pub async fn user_record(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<UserRecordResponse>, AppError> {
    let timeframe = Timeframe::parse(query.timeframe.as_deref())?;

    let picks = pick_repo::get_graded_for_user(&state.db, &user_id, timeframe.cutoff()).await?;
    let outcomes: Vec<Outcome> = picks
        .iter()
        .filter_map(|p| match p.state() {
            GradeState::Decided { outcome, .. } => Some(outcome),
            GradeState::Pending => None,
        })
        .collect();

    let record = Record::from_outcomes(&outcomes);
    let pending = pick_repo::count_pending(&state.db, &user_id).await?;

    Ok(Json(UserRecordResponse {
        user_id,
        record,
        total: record.total(),
        win_percentage: win_rate(record.won, record.lost),
        streak: format_streak(streak(&outcomes)),
        pending,
    }))
}

#[derive(Deserialize)]
pub struct PickResultsQuery {
    pub user_id: Option<String>,
    pub result: Option<String>,
}

#[derive(Serialize)]
pub struct PickResultsResponse {
    pub total: usize,
    pub picks: Vec<PickDetail>,
}

/// Graded picks across every user, for checking what the grading engine has
/// settled without impersonating each user in turn.
pub async fn pick_results(
    State(state): State<AppState>,
    Query(query): Query<PickResultsQuery>,
) -> Result<Json<PickResultsResponse>, AppError> {
    let result = match query.result.as_deref() {
        Some(raw) => Some(Outcome::from_str(raw).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown result filter: {raw}"))
        })?),
        None => None,
    };

    let picks =
        pick_repo::get_graded_details(&state.db, query.user_id.as_deref(), result).await?;

    Ok(Json(PickResultsResponse {
        total: picks.len(),
        picks,
    }))
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub timeframe: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub current_user_rank: Option<u32>,
    pub total_users: usize,
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let timeframe = Timeframe::parse(query.timeframe.as_deref())?;

    // Most recently graded first; per-user grouping preserves both streak
    // order and first-encounter order for tie-breaks.
    let picks = pick_repo::get_graded(&state.db, timeframe.cutoff()).await?;

    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<Outcome>> = HashMap::new();
    for pick in &picks {
        let GradeState::Decided { outcome, .. } = pick.state() else {
            continue;
        };
        grouped
            .entry(pick.user_id.clone())
            .or_insert_with(|| {
                order.push(pick.user_id.clone());
                Vec::new()
            })
            .push(outcome);
    }

    let users: Vec<UserOutcomes> = order
        .into_iter()
        .map(|user_id| {
            let outcomes = grouped.remove(&user_id).unwrap_or_default();
            UserOutcomes { user_id, outcomes }
        })
        .collect();

    let entries = rank_users(users, query.user_id.as_deref());
    let current_user_rank = entries.iter().find(|e| e.is_user).map(|e| e.rank);
    let total_users = entries.len();

    Ok(Json(LeaderboardResponse {
        leaderboard: entries,
        current_user_rank,
        total_users,
    }))
}
