use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Games + props
        .route("/api/games", get(handlers::games::list))
        .route("/api/games/:id", get(handlers::games::detail))
        .route("/api/players/:name/props", get(handlers::props::by_player))
        // Board refresh (schedule + projections)
        .route("/api/board/refresh", post(handlers::board::refresh))
        // Picks
        .route("/api/picks", post(handlers::picks::create))
        .route("/api/picks/:id", delete(handlers::picks::remove))
        .route("/api/picks/active", get(handlers::picks::active))
        .route("/api/picks/game/:game_id", get(handlers::picks::for_game))
        .route("/api/picks/history", get(handlers::picks::history))
        // Grading
        .route("/api/grading/games/:id", post(handlers::grading::grade_game))
        .route("/api/grading/run", post(handlers::grading::grade_all))
        .route("/api/grading/results", get(handlers::grading::pick_results))
        .route("/api/grading/records/:user_id", get(handlers::grading::user_record))
        .route("/api/grading/leaderboard", get(handlers::grading::leaderboard))
        .layer(middleware::from_fn(require_auth));

    // CORS: frontend is served from a different origin in dev
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
