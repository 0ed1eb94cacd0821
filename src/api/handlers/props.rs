use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::prop_repo;
use crate::errors::AppError;
use crate::models::{PlayerProp, PropKind};
use crate::AppState;

#[derive(Deserialize)]
pub struct PropsQuery {
    pub prop_type: Option<String>,
}

#[derive(Serialize)]
pub struct PlayerPropsResponse {
    pub player_name: String,
    pub props: Vec<PlayerProp>,
}

pub async fn by_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<PropsQuery>,
) -> Result<Json<PlayerPropsResponse>, AppError> {
    let prop_type = match query.prop_type.as_deref() {
        Some(raw) => Some(
            PropKind::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid prop type: {raw}")))?,
        ),
        None => None,
    };

    let props = prop_repo::get_props_by_player(&state.db, &name, prop_type).await?;

    if props.is_empty() {
        return Err(AppError::NotFound("No props found for this player".into()));
    }

    Ok(Json(PlayerPropsResponse {
        player_name: name,
        props,
    }))
}
