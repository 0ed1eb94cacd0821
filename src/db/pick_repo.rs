use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::{Outcome, Pick, PickDetail, PropKind, Side};

const DETAIL_COLUMNS: &str = r#"
    p.id, p.prop_id, p.user_id, pp.player_name, pp.prop_type,
    p.selection, p.line, p.result, p.actual_value, p.graded_at, p.created_at,
    g.id AS game_id, g.home_team, g.away_team, g.commence_time
"#;

/// Create the user's pick on a prop, or replace side/line while the pick is
/// still ungraded. Returns None when a graded pick already occupies the slot.
pub async fn upsert_pick(
    pool: &PgPool,
    user_id: &str,
    prop_id: i64,
    side: Side,
    line: Decimal,
) -> anyhow::Result<Option<Pick>> {
    let pick = sqlx::query_as::<_, Pick>(
        r#"
        INSERT INTO picks (prop_id, user_id, selection, line)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, prop_id) DO UPDATE
            SET selection = EXCLUDED.selection, line = EXCLUDED.line
            WHERE picks.result IS NULL
        RETURNING *
        "#,
    )
    .bind(prop_id)
    .bind(user_id)
    .bind(side.as_str())
    .bind(line)
    .fetch_optional(pool)
    .await?;

    Ok(pick)
}

/// Delete one of the user's picks; graded picks are immutable and stay.
pub async fn delete_pick(pool: &PgPool, user_id: &str, pick_id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query(
        "DELETE FROM picks WHERE id = $1 AND user_id = $2 AND result IS NULL",
    )
    .bind(pick_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// The user's ungraded picks, soonest game first.
pub async fn get_active_picks(pool: &PgPool, user_id: &str) -> anyhow::Result<Vec<PickDetail>> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM picks p
        JOIN player_props pp ON pp.id = p.prop_id
        JOIN games g ON g.id = pp.game_id
        WHERE p.user_id = $1 AND p.result IS NULL
        ORDER BY g.commence_time
        "#
    );

    let picks = sqlx::query_as::<_, PickDetail>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(picks)
}

/// The user's selections within one game, for marking the board.
pub async fn get_picks_for_game(
    pool: &PgPool,
    user_id: &str,
    game_id: i64,
) -> anyhow::Result<Vec<PickDetail>> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM picks p
        JOIN player_props pp ON pp.id = p.prop_id
        JOIN games g ON g.id = pp.game_id
        WHERE p.user_id = $1 AND g.id = $2
        ORDER BY pp.player_name, pp.prop_type
        "#
    );

    let picks = sqlx::query_as::<_, PickDetail>(&query)
        .bind(user_id)
        .bind(game_id)
        .fetch_all(pool)
        .await?;

    Ok(picks)
}

/// Graded picks for the user, most recently graded first.
pub async fn get_history(
    pool: &PgPool,
    user_id: &str,
    result: Option<Outcome>,
    prop_type: Option<PropKind>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<PickDetail>> {
    let mut query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM picks p
        JOIN player_props pp ON pp.id = p.prop_id
        JOIN games g ON g.id = pp.game_id
        WHERE p.user_id = $1 AND p.result IS NOT NULL
        "#
    );
    if result.is_some() {
        query.push_str(" AND p.result = $4");
    }
    if prop_type.is_some() {
        query.push_str(if result.is_some() {
            " AND pp.prop_type = $5"
        } else {
            " AND pp.prop_type = $4"
        });
    }
    query.push_str(" ORDER BY p.graded_at DESC LIMIT $2 OFFSET $3");

    let mut q = sqlx::query_as::<_, PickDetail>(&query)
        .bind(user_id)
        .bind(limit)
        .bind(offset);
    if let Some(outcome) = result {
        q = q.bind(outcome.as_str());
    }
    if let Some(kind) = prop_type {
        q = q.bind(kind.as_str());
    }

    let picks = q.fetch_all(pool).await?;
    Ok(picks)
}

/// Ungraded picks across all props of one game, joined with player/prop info
/// so the grading engine can look each player up in the boxscore.
pub async fn get_ungraded_for_game(
    pool: &PgPool,
    game_id: i64,
) -> anyhow::Result<Vec<PickDetail>> {
    let query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM picks p
        JOIN player_props pp ON pp.id = p.prop_id
        JOIN games g ON g.id = pp.game_id
        WHERE g.id = $1 AND p.result IS NULL
        ORDER BY p.id
        "#
    );

    let picks = sqlx::query_as::<_, PickDetail>(&query)
        .bind(game_id)
        .fetch_all(pool)
        .await?;

    Ok(picks)
}

/// Settle one pick. The `result IS NULL` guard makes the outcome write-once:
/// settling an already-graded pick updates zero rows.
pub async fn settle_pick(
    conn: &mut PgConnection,
    pick_id: i64,
    outcome: Outcome,
    actual_value: Decimal,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE picks
        SET result = $2, actual_value = $3, graded_at = NOW()
        WHERE id = $1 AND result IS NULL
        "#,
    )
    .bind(pick_id)
    .bind(outcome.as_str())
    .bind(actual_value)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Graded picks for one user, most recently graded first, optionally bounded
/// to a trailing window.
pub async fn get_graded_for_user(
    pool: &PgPool,
    user_id: &str,
    since: Option<DateTime<Utc>>,
) -> anyhow::Result<Vec<Pick>> {
    let picks = match since {
        Some(cutoff) => {
            sqlx::query_as::<_, Pick>(
                r#"
                SELECT * FROM picks
                WHERE user_id = $1 AND result IS NOT NULL AND graded_at >= $2
                ORDER BY graded_at DESC
                "#,
            )
            .bind(user_id)
            .bind(cutoff)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Pick>(
                r#"
                SELECT * FROM picks
                WHERE user_id = $1 AND result IS NOT NULL
                ORDER BY graded_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(picks)
}

/// All graded picks in the window, most recently graded first, for the
/// leaderboard to group per user.
pub async fn get_graded(
    pool: &PgPool,
    since: Option<DateTime<Utc>>,
) -> anyhow::Result<Vec<Pick>> {
    let picks = match since {
        Some(cutoff) => {
            sqlx::query_as::<_, Pick>(
                r#"
                SELECT * FROM picks
                WHERE result IS NOT NULL AND graded_at >= $1
                ORDER BY graded_at DESC
                "#,
            )
            .bind(cutoff)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Pick>(
                "SELECT * FROM picks WHERE result IS NOT NULL ORDER BY graded_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(picks)
}

/// Graded picks across all users with full prop/game context, most recently
/// graded first, optionally narrowed to one user or one outcome.
pub async fn get_graded_details(
    pool: &PgPool,
    user_id: Option<&str>,
    result: Option<Outcome>,
) -> anyhow::Result<Vec<PickDetail>> {
    let mut query = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM picks p
        JOIN player_props pp ON pp.id = p.prop_id
        JOIN games g ON g.id = pp.game_id
        WHERE p.result IS NOT NULL
        "#
    );
    if user_id.is_some() {
        query.push_str(" AND p.user_id = $1");
    }
    if result.is_some() {
        query.push_str(if user_id.is_some() {
            " AND p.result = $2"
        } else {
            " AND p.result = $1"
        });
    }
    query.push_str(" ORDER BY p.graded_at DESC");

    let mut q = sqlx::query_as::<_, PickDetail>(&query);
    if let Some(user) = user_id {
        q = q.bind(user);
    }
    if let Some(outcome) = result {
        q = q.bind(outcome.as_str());
    }

    let picks = q.fetch_all(pool).await?;
    Ok(picks)
}

/// Count of the user's still-ungraded picks.
pub async fn count_pending(pool: &PgPool, user_id: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM picks WHERE user_id = $1 AND result IS NULL",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
