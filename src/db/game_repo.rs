use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::models::Game;

/// Insert a game or refresh its teams/commence time if the external id is
/// already known.
pub async fn upsert_game(
    pool: &PgPool,
    external_id: &str,
    home_team: &str,
    away_team: &str,
    commence_time: DateTime<Utc>,
) -> anyhow::Result<Game> {
    let game = sqlx::query_as::<_, Game>(
        r#"
        INSERT INTO games (external_id, home_team, away_team, commence_time)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (external_id) DO UPDATE
            SET home_team = EXCLUDED.home_team,
                away_team = EXCLUDED.away_team,
                commence_time = EXCLUDED.commence_time,
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(external_id)
    .bind(home_team)
    .bind(away_team)
    .bind(commence_time)
    .fetch_one(pool)
    .await?;

    Ok(game)
}

pub async fn get_game(pool: &PgPool, id: i64) -> anyhow::Result<Option<Game>> {
    let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(game)
}

/// Games commencing within the next `days_ahead` days, soonest first.
pub async fn get_upcoming_games(pool: &PgPool, days_ahead: u32) -> anyhow::Result<Vec<Game>> {
    let now = Utc::now();
    let until = now + Duration::days(days_ahead as i64);

    let games = sqlx::query_as::<_, Game>(
        r#"
        SELECT * FROM games
        WHERE commence_time >= $1 AND commence_time <= $2
        ORDER BY commence_time
        "#,
    )
    .bind(now)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(games)
}

/// Commenced games that still carry ungraded picks. Candidates for the
/// grading sweep; completion is verified against the stats source per game.
pub async fn get_gradable_games(pool: &PgPool) -> anyhow::Result<Vec<Game>> {
    let games = sqlx::query_as::<_, Game>(
        r#"
        SELECT DISTINCT g.* FROM games g
        JOIN player_props pp ON pp.game_id = g.id
        JOIN picks p ON p.prop_id = pp.id
        WHERE g.commence_time < NOW() AND p.result IS NULL
        ORDER BY g.commence_time
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(games)
}
