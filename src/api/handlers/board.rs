use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::services::board::{refresh_board, BoardRefreshOutcome};
use crate::AppState;

use super::ApiResponse;

/// Fetch the upcoming schedule and regenerate projection props. Synchronous:
/// the response returns after the full sweep, which takes a while with
/// rate-limit pauses between stats requests.
pub async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BoardRefreshOutcome>>, AppError> {
    let outcome = refresh_board(&state.db, &state.stats, &state.config).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
