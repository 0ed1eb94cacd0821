use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::time::{interval, sleep, Duration};

use crate::db::{game_repo, pick_repo};
use crate::models::Game;
use crate::nba::{StatsClient, GAME_STATUS_FINAL};
use crate::scoring::{grade, GradeSummary};

/// Why a grading pass over one game stopped where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    /// The stats source has not marked the game final yet.
    NotCompleted,
    /// Game is final but the boxscore could not be fetched; retry later.
    BoxscoreUnavailable,
    NoPicks,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameGradeReport {
    pub game_id: i64,
    pub game: String,
    pub status: GradeStatus,
    pub graded: u32,
    pub results: GradeSummary,
}

impl GameGradeReport {
    fn short_circuit(game: &Game, status: GradeStatus) -> Self {
        Self {
            game_id: game.id,
            game: game.matchup(),
            status,
            graded: 0,
            results: GradeSummary::default(),
        }
    }
}

/// Grade every ungraded pick attached to one game.
///
/// Requires a verified final status from the boxscore summary before touching
/// any pick; elapsed commence time alone is never trusted. All settles for
/// the game commit in one transaction, so a persistence failure rolls the
/// whole batch back and leaves every pick retryable.
pub async fn grade_game(
    pool: &PgPool,
    stats: &StatsClient,
    game: &Game,
) -> anyhow::Result<GameGradeReport> {
    if !game.has_commenced(Utc::now()) {
        tracing::debug!(game = %game.matchup(), "Game has not tipped off yet");
        return Ok(GameGradeReport::short_circuit(game, GradeStatus::NotCompleted));
    }

    let status = stats.game_status(&game.external_id).await?;
    if status != GAME_STATUS_FINAL {
        tracing::debug!(game = %game.matchup(), status, "Game not final yet");
        return Ok(GameGradeReport::short_circuit(game, GradeStatus::NotCompleted));
    }

    let boxscore = match stats.boxscore(&game.external_id).await {
        Ok(lines) if !lines.is_empty() => lines,
        Ok(_) => {
            tracing::warn!(game = %game.matchup(), "Final game has empty boxscore");
            return Ok(GameGradeReport::short_circuit(game, GradeStatus::BoxscoreUnavailable));
        }
        Err(e) => {
            tracing::warn!(error = %e, game = %game.matchup(), "Failed to fetch boxscore");
            return Ok(GameGradeReport::short_circuit(game, GradeStatus::BoxscoreUnavailable));
        }
    };

    let picks = pick_repo::get_ungraded_for_game(pool, game.id).await?;
    if picks.is_empty() {
        return Ok(GameGradeReport::short_circuit(game, GradeStatus::NoPicks));
    }

    tracing::info!(game = %game.matchup(), picks = picks.len(), "Grading picks");

    let mut summary = GradeSummary::default();
    let mut tx = pool.begin().await?;

    for pick in &picks {
        let Some(side) = crate::models::Side::from_str(&pick.selection) else {
            tracing::error!(pick_id = pick.id, selection = %pick.selection, "Unknown selection");
            continue;
        };
        let Some(kind) = crate::models::PropKind::from_str(&pick.prop_type) else {
            tracing::error!(pick_id = pick.id, prop_type = %pick.prop_type, "Unknown prop type");
            continue;
        };

        let Some(line) = boxscore.get(&pick.player_name) else {
            tracing::debug!(player = %pick.player_name, "Player not in boxscore");
            summary.not_found += 1;
            continue;
        };

        let actual = line.stat(kind);
        let outcome = grade(side, pick.line, actual);

        // rows_affected 0 means someone graded this pick first; don't count it
        if pick_repo::settle_pick(&mut tx, pick.id, outcome, actual).await? {
            summary.record(outcome);
            tracing::debug!(
                pick_id = pick.id,
                player = %pick.player_name,
                stat = %kind,
                actual = %actual,
                line = %pick.line,
                outcome = %outcome,
                "Pick settled"
            );
        }
    }

    tx.commit().await?;

    counter!("picks_graded_total").increment(summary.graded() as u64);
    counter!("picks_not_found_total").increment(summary.not_found as u64);

    Ok(GameGradeReport {
        game_id: game.id,
        game: game.matchup(),
        status: GradeStatus::Completed,
        graded: summary.graded(),
        results: summary,
    })
}

/// Grade every commenced game that still carries ungraded picks, pausing
/// between games to respect the stats endpoint's request budget.
pub async fn grade_all(
    pool: &PgPool,
    stats: &StatsClient,
    rate_limit_ms: u64,
) -> anyhow::Result<Vec<GameGradeReport>> {
    counter!("grading_runs_total").increment(1);

    let games = game_repo::get_gradable_games(pool).await?;
    if games.is_empty() {
        tracing::debug!("No gradable games");
        return Ok(Vec::new());
    }

    let mut reports = Vec::with_capacity(games.len());
    for (idx, game) in games.iter().enumerate() {
        if idx > 0 {
            sleep(Duration::from_millis(rate_limit_ms)).await;
        }

        match grade_game(pool, stats, game).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!(error = %e, game = %game.matchup(), "Grading failed");
            }
        }
    }

    Ok(reports)
}

/// Periodic sweep over gradable games, for settling picks without an
/// operator calling the grading endpoint.
pub async fn run_grading_sweep(
    pool: PgPool,
    stats: StatsClient,
    interval_secs: u64,
    rate_limit_ms: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        match grade_all(&pool, &stats, rate_limit_ms).await {
            Ok(reports) => {
                let graded: u32 = reports.iter().map(|r| r.graded).sum();
                if graded > 0 {
                    tracing::info!(games = reports.len(), graded, "Grading sweep settled picks");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Grading sweep failed");
            }
        }
    }
}
