use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{PlayerProp, PropKind};

pub async fn create_prop(
    pool: &PgPool,
    game_id: i64,
    player_name: &str,
    prop_type: PropKind,
    line: Decimal,
    over_odds: i32,
    under_odds: i32,
    bookmaker: &str,
) -> anyhow::Result<PlayerProp> {
    let prop = sqlx::query_as::<_, PlayerProp>(
        r#"
        INSERT INTO player_props (game_id, player_name, prop_type, line, over_odds, under_odds, bookmaker)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(game_id)
    .bind(player_name)
    .bind(prop_type.as_str())
    .bind(line)
    .bind(over_odds)
    .bind(under_odds)
    .bind(bookmaker)
    .fetch_one(pool)
    .await?;

    Ok(prop)
}

pub async fn get_prop(pool: &PgPool, id: i64) -> anyhow::Result<Option<PlayerProp>> {
    let prop = sqlx::query_as::<_, PlayerProp>("SELECT * FROM player_props WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(prop)
}

pub async fn get_props_by_game(pool: &PgPool, game_id: i64) -> anyhow::Result<Vec<PlayerProp>> {
    let props = sqlx::query_as::<_, PlayerProp>(
        "SELECT * FROM player_props WHERE game_id = $1 ORDER BY player_name, prop_type",
    )
    .bind(game_id)
    .fetch_all(pool)
    .await?;

    Ok(props)
}

pub async fn get_props_by_player(
    pool: &PgPool,
    player_name: &str,
    prop_type: Option<PropKind>,
) -> anyhow::Result<Vec<PlayerProp>> {
    let props = match prop_type {
        Some(kind) => {
            sqlx::query_as::<_, PlayerProp>(
                "SELECT * FROM player_props WHERE player_name = $1 AND prop_type = $2 ORDER BY updated_at DESC",
            )
            .bind(player_name)
            .bind(kind.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, PlayerProp>(
                "SELECT * FROM player_props WHERE player_name = $1 ORDER BY updated_at DESC",
            )
            .bind(player_name)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(props)
}

/// Wipe a game's props before regenerating projections. Picks cascade with
/// their prop, so only props without picks are cleared.
pub async fn delete_untouched_props(pool: &PgPool, game_id: i64) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM player_props pp
        WHERE pp.game_id = $1
          AND NOT EXISTS (SELECT 1 FROM picks p WHERE p.prop_id = pp.id)
        "#,
    )
    .bind(game_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
