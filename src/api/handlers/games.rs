use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{game_repo, prop_repo};
use crate::errors::AppError;
use crate::models::{Game, PlayerProp};
use crate::AppState;

#[derive(Deserialize)]
pub struct GamesQuery {
    pub days_ahead: Option<u32>,
}

#[derive(Serialize)]
pub struct GameWithProps {
    #[serde(flatten)]
    pub game: Game,
    pub player_props: Vec<PlayerProp>,
}

#[derive(Serialize)]
pub struct GameListResponse {
    pub games: Vec<GameWithProps>,
    pub total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<GameListResponse>, AppError> {
    let days_ahead = query.days_ahead.unwrap_or(state.config.schedule_days_ahead);
    let games = game_repo::get_upcoming_games(&state.db, days_ahead).await?;

    let mut out = Vec::with_capacity(games.len());
    for game in games {
        let player_props = prop_repo::get_props_by_game(&state.db, game.id).await?;
        out.push(GameWithProps { game, player_props });
    }

    let total = out.len();
    Ok(Json(GameListResponse { games: out, total }))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GameWithProps>, AppError> {
    let game = game_repo::get_game(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".into()))?;

    let player_props = prop_repo::get_props_by_game(&state.db, game.id).await?;

    Ok(Json(GameWithProps { game, player_props }))
}
