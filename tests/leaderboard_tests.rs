mod common;

use rust_decimal::Decimal;

use heater::db::pick_repo;
use heater::models::{Outcome, PropKind, Side};
use heater::scoring::record::{streak, Record};

fn dec(n: i64, scale: u32) -> Decimal {
    Decimal::new(n, scale)
}

/// Seed `outcomes.len()` graded picks for one user, most recent outcome
/// first, each on its own prop.
async fn seed_outcomes(
    pool: &sqlx::PgPool,
    game_id: i64,
    user_id: &str,
    outcomes: &[Outcome],
) {
    for (idx, outcome) in outcomes.iter().enumerate() {
        let prop = common::seed_prop(
            pool,
            game_id,
            &format!("Player {user_id} {idx}"),
            PropKind::Points,
            dec(205, 1),
        )
        .await;
        common::seed_graded_pick(
            pool,
            prop.id,
            user_id,
            Side::Over,
            prop.line,
            *outcome,
            idx as i64 + 1, // idx 0 graded most recently
        )
        .await;
    }
}

#[tokio::test]
async fn test_graded_for_user_orders_most_recent_first() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400030", -6).await;

    use Outcome::{Lost, Won};
    seed_outcomes(&pool, game.id, "user_a", &[Won, Won, Lost, Won]).await;

    let picks = pick_repo::get_graded_for_user(&pool, "user_a", None)
        .await
        .expect("query should succeed");
    let outcomes: Vec<Outcome> = picks.iter().filter_map(|p| p.outcome()).collect();

    assert_eq!(outcomes, vec![Won, Won, Lost, Won]);
    assert_eq!(streak(&outcomes), 2);

    let record = Record::from_outcomes(&outcomes);
    assert_eq!(record.won, 3);
    assert_eq!(record.lost, 1);
}

#[tokio::test]
async fn test_graded_window_filters_by_graded_at() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400031", -6).await;

    let recent_prop =
        common::seed_prop(&pool, game.id, "Recent Player", PropKind::Points, dec(205, 1)).await;
    common::seed_graded_pick(
        &pool,
        recent_prop.id,
        "user_a",
        Side::Over,
        recent_prop.line,
        Outcome::Won,
        60, // one hour ago
    )
    .await;

    let old_prop =
        common::seed_prop(&pool, game.id, "Old Player", PropKind::Points, dec(205, 1)).await;
    common::seed_graded_pick(
        &pool,
        old_prop.id,
        "user_a",
        Side::Over,
        old_prop.line,
        Outcome::Lost,
        60 * 24 * 10, // ten days ago
    )
    .await;

    let cutoff = chrono::Utc::now() - chrono::Duration::days(7);
    let windowed = pick_repo::get_graded(&pool, Some(cutoff))
        .await
        .expect("query should succeed");

    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].outcome(), Some(Outcome::Won));

    let overall = pick_repo::get_graded(&pool, None)
        .await
        .expect("query should succeed");
    assert_eq!(overall.len(), 2);
}

#[tokio::test]
async fn test_count_pending_ignores_graded() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400032", 6).await;

    let prop_a = common::seed_prop(&pool, game.id, "Pending One", PropKind::Points, dec(205, 1)).await;
    common::seed_pick(&pool, prop_a.id, "user_a", Side::Over, prop_a.line).await;

    let prop_b = common::seed_prop(&pool, game.id, "Pending Two", PropKind::Assists, dec(65, 1)).await;
    common::seed_pick(&pool, prop_b.id, "user_a", Side::Under, prop_b.line).await;

    let prop_c = common::seed_prop(&pool, game.id, "Graded One", PropKind::Rebounds, dec(95, 1)).await;
    common::seed_graded_pick(&pool, prop_c.id, "user_a", Side::Over, prop_c.line, Outcome::Won, 5).await;

    let pending = pick_repo::count_pending(&pool, "user_a")
        .await
        .expect("query should succeed");
    assert_eq!(pending, 2);
}

#[tokio::test]
async fn test_graded_details_filters_by_user_and_result() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400033", -6).await;

    use Outcome::{Lost, Push, Won};
    seed_outcomes(&pool, game.id, "user_a", &[Won, Lost]).await;
    seed_outcomes(&pool, game.id, "user_b", &[Won, Push]).await;

    // an ungraded pick must never show up in the listing
    let pending_prop =
        common::seed_prop(&pool, game.id, "Pending Player", PropKind::Points, dec(205, 1)).await;
    common::seed_pick(&pool, pending_prop.id, "user_a", Side::Over, pending_prop.line).await;

    let all = pick_repo::get_graded_details(&pool, None, None)
        .await
        .expect("query should succeed");
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|p| p.result.is_some()));
    // carries the joined prop/game context
    assert_eq!(all[0].game_id, game.id);
    assert!(all[0].player_name.starts_with("Player"));

    let user_a = pick_repo::get_graded_details(&pool, Some("user_a"), None)
        .await
        .expect("query should succeed");
    assert_eq!(user_a.len(), 2);
    assert!(user_a.iter().all(|p| p.user_id == "user_a"));

    let won = pick_repo::get_graded_details(&pool, None, Some(Won))
        .await
        .expect("query should succeed");
    assert_eq!(won.len(), 2);

    let user_b_push = pick_repo::get_graded_details(&pool, Some("user_b"), Some(Push))
        .await
        .expect("query should succeed");
    assert_eq!(user_b_push.len(), 1);
    assert_eq!(user_b_push[0].user_id, "user_b");
}
