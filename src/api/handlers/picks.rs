use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::api::auth::CurrentUser;
use crate::db::{pick_repo, prop_repo};
use crate::errors::AppError;
use crate::models::{Outcome, PickDetail, PropKind, Side};
use crate::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct CreatePick {
    pub prop_id: i64,
    pub selection: String,
}

#[derive(Serialize)]
pub struct PickSaved {
    pub pick_id: i64,
    pub message: &'static str,
}

/// Save the caller's pick on a prop, replacing any earlier ungraded pick on
/// the same prop. The line is captured from the prop at save time so later
/// board refreshes can't move it under the user.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<CreatePick>,
) -> Result<(StatusCode, Json<ApiResponse<PickSaved>>), AppError> {
    let side = Side::from_str(&body.selection)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid selection: {}", body.selection)))?;

    let prop = prop_repo::get_prop(&state.db, body.prop_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prop not found".into()))?;

    let pick = pick_repo::upsert_pick(&state.db, &user_id, prop.id, side, prop.line)
        .await?
        .ok_or_else(|| AppError::BadRequest("Pick is already graded".into()))?;

    counter!("picks_created_total").increment(1);
    tracing::info!(
        user = %user_id,
        pick_id = pick.id,
        player = %prop.player_name,
        prop_type = %prop.prop_type,
        side = %side,
        line = %prop.line,
        "Pick saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PickSaved {
            pick_id: pick.id,
            message: "Pick saved",
        })),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(pick_id): Path<i64>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    let deleted = pick_repo::delete_pick(&state.db, &user_id, pick_id).await?;

    if !deleted {
        return Err(AppError::NotFound("Pick not found".into()));
    }

    Ok(Json(ApiResponse::ok("Pick deleted")))
}

pub async fn active(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<Vec<PickDetail>>>, AppError> {
    let picks = pick_repo::get_active_picks(&state.db, &user_id).await?;
    Ok(Json(ApiResponse::ok(picks)))
}

#[derive(Serialize)]
pub struct GamePicks {
    /// "{player}-{prop_type}" → selection, for marking the board.
    pub picks: HashMap<String, String>,
}

pub async fn for_game(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(game_id): Path<i64>,
) -> Result<Json<GamePicks>, AppError> {
    let rows = pick_repo::get_picks_for_game(&state.db, &user_id, game_id).await?;

    let picks = rows
        .into_iter()
        .map(|p| (format!("{}-{}", p.player_name, p.prop_type), p.selection))
        .collect();

    Ok(Json(GamePicks { picks }))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub result: Option<String>,
    pub prop_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<PickDetail>>>, AppError> {
    let result = match query.result.as_deref() {
        Some(raw) => Some(
            Outcome::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid result: {raw}")))?,
        ),
        None => None,
    };
    let prop_type = match query.prop_type.as_deref() {
        Some(raw) => Some(
            PropKind::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid prop type: {raw}")))?,
        ),
        None => None,
    };

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let picks =
        pick_repo::get_history(&state.db, &user_id, result, prop_type, limit, offset).await?;

    Ok(Json(ApiResponse::ok(picks)))
}
