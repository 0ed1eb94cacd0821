mod common;

use rust_decimal::Decimal;

use heater::db::{game_repo, pick_repo};
use heater::models::{GradeState, Outcome, PropKind, Side};

fn dec(n: i64, scale: u32) -> Decimal {
    Decimal::new(n, scale)
}

#[tokio::test]
async fn test_settle_pick_is_write_once() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400001", -3).await;
    let prop = common::seed_prop(&pool, game.id, "Jayson Tatum", PropKind::Points, dec(245, 1)).await;
    let pick = common::seed_pick(&pool, prop.id, "user_a", Side::Over, prop.line).await;

    let mut conn = pool.acquire().await.expect("acquire");

    let settled = pick_repo::settle_pick(&mut conn, pick.id, Outcome::Won, Decimal::from(30))
        .await
        .expect("settle should succeed");
    assert!(settled, "First settle should update the pick");

    // Second settle must be a no-op
    let settled_again = pick_repo::settle_pick(&mut conn, pick.id, Outcome::Lost, Decimal::from(10))
        .await
        .expect("settle should succeed");
    assert!(!settled_again, "Re-grading a graded pick must not match any row");

    let stored: heater::models::Pick =
        sqlx::query_as("SELECT * FROM picks WHERE id = $1")
            .bind(pick.id)
            .fetch_one(&pool)
            .await
            .expect("pick should exist");

    assert!(stored.is_graded());
    match stored.state() {
        GradeState::Decided { outcome, actual, .. } => {
            assert_eq!(outcome, Outcome::Won);
            assert_eq!(actual, Decimal::from(30));
        }
        GradeState::Pending => panic!("Settled pick should report a decided state"),
    }
    assert!(stored.graded_at.is_some());
}

#[tokio::test]
async fn test_upsert_pick_replaces_side_until_graded() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400002", 24).await;
    let prop = common::seed_prop(&pool, game.id, "Luka Doncic", PropKind::Assists, dec(85, 1)).await;

    let first = pick_repo::upsert_pick(&pool, "user_a", prop.id, Side::Over, prop.line)
        .await
        .expect("upsert should succeed")
        .expect("ungraded slot should accept the pick");

    let replaced = pick_repo::upsert_pick(&pool, "user_a", prop.id, Side::Under, prop.line)
        .await
        .expect("upsert should succeed")
        .expect("ungraded pick should be replaceable");

    assert_eq!(replaced.id, first.id, "Replacement keeps the same row");
    assert_eq!(replaced.side(), Some(Side::Under));

    // Grade it, then a further replacement must be refused
    let mut conn = pool.acquire().await.expect("acquire");
    pick_repo::settle_pick(&mut conn, first.id, Outcome::Won, Decimal::from(12))
        .await
        .expect("settle should succeed");
    drop(conn);

    let refused = pick_repo::upsert_pick(&pool, "user_a", prop.id, Side::Over, prop.line)
        .await
        .expect("upsert should succeed");
    assert!(refused.is_none(), "Graded pick must not be replaceable");
}

#[tokio::test]
async fn test_delete_pick_spares_graded_picks() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400003", -5).await;
    let prop = common::seed_prop(&pool, game.id, "Nikola Jokic", PropKind::Rebounds, dec(125, 1)).await;
    let graded = common::seed_graded_pick(
        &pool,
        prop.id,
        "user_a",
        Side::Over,
        prop.line,
        Outcome::Won,
        60,
    )
    .await;

    let deleted = pick_repo::delete_pick(&pool, "user_a", graded.id)
        .await
        .expect("delete should succeed");
    assert!(!deleted, "Graded picks are immutable");

    let prop2 = common::seed_prop(&pool, game.id, "Jamal Murray", PropKind::Points, dec(215, 1)).await;
    let pending = common::seed_pick(&pool, prop2.id, "user_a", Side::Under, prop2.line).await;

    let deleted = pick_repo::delete_pick(&pool, "user_a", pending.id)
        .await
        .expect("delete should succeed");
    assert!(deleted, "Ungraded picks can be deleted");
}

#[tokio::test]
async fn test_gradable_games_need_commenced_time_and_pending_picks() {
    let pool = common::setup_test_db().await;

    // Commenced game with a pending pick → gradable
    let past = common::seed_game(&pool, "0022400010", -4).await;
    let past_prop = common::seed_prop(&pool, past.id, "Stephen Curry", PropKind::Points, dec(275, 1)).await;
    common::seed_pick(&pool, past_prop.id, "user_a", Side::Over, past_prop.line).await;

    // Future game with a pending pick → not gradable yet
    let future = common::seed_game(&pool, "0022400011", 12).await;
    let future_prop = common::seed_prop(&pool, future.id, "Stephen Curry", PropKind::Assists, dec(55, 1)).await;
    common::seed_pick(&pool, future_prop.id, "user_a", Side::Under, future_prop.line).await;

    // Commenced game whose only pick is already graded → nothing to do
    let done = common::seed_game(&pool, "0022400012", -8).await;
    let done_prop = common::seed_prop(&pool, done.id, "Derrick White", PropKind::Points, dec(155, 1)).await;
    common::seed_graded_pick(&pool, done_prop.id, "user_a", Side::Over, done_prop.line, Outcome::Lost, 30).await;

    let gradable = game_repo::get_gradable_games(&pool)
        .await
        .expect("query should succeed");

    let ids: Vec<i64> = gradable.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![past.id]);
}

#[tokio::test]
async fn test_ungraded_for_game_joins_prop_details() {
    let pool = common::setup_test_db().await;
    let game = common::seed_game(&pool, "0022400020", -2).await;
    let prop = common::seed_prop(&pool, game.id, "Anthony Edwards", PropKind::Points, dec(265, 1)).await;
    common::seed_pick(&pool, prop.id, "user_a", Side::Over, prop.line).await;
    common::seed_pick(&pool, prop.id, "user_b", Side::Under, prop.line).await;

    let other_prop = common::seed_prop(&pool, game.id, "Rudy Gobert", PropKind::Rebounds, dec(115, 1)).await;
    common::seed_graded_pick(&pool, other_prop.id, "user_a", Side::Over, other_prop.line, Outcome::Push, 10).await;

    let ungraded = pick_repo::get_ungraded_for_game(&pool, game.id)
        .await
        .expect("query should succeed");

    assert_eq!(ungraded.len(), 2);
    assert!(ungraded.iter().all(|p| p.result.is_none()));
    assert!(ungraded.iter().all(|p| p.player_name == "Anthony Edwards"));
    assert_eq!(ungraded[0].game_id, game.id);
}
