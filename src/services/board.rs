use chrono::{Duration as ChronoDuration, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::time::{interval, sleep, Duration};

use crate::config::AppConfig;
use crate::db::{game_repo, prop_repo};
use crate::nba::{team_name, RosterPlayer, StatsClient};
use crate::projections::{project_player, PROJECTION_BOOKMAKER, PROJECTION_ODDS};

const GAME_LOG_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BoardRefreshOutcome {
    pub games_updated: u32,
    pub props_written: u32,
}

/// Fetch the upcoming schedule and regenerate projection props for every
/// game found. Each stats request is spaced out by the configured delay.
pub async fn refresh_board(
    pool: &PgPool,
    stats: &StatsClient,
    config: &AppConfig,
) -> anyhow::Result<BoardRefreshOutcome> {
    counter!("board_refreshes_total").increment(1);

    let pause = Duration::from_millis(config.stats_rate_limit_ms);
    let mut outcome = BoardRefreshOutcome::default();
    let today = Utc::now().date_naive();

    for day_offset in 0..config.schedule_days_ahead {
        let date = today + ChronoDuration::days(day_offset as i64);

        let scheduled = match stats.scoreboard(date).await {
            Ok(games) => games,
            Err(e) => {
                tracing::error!(error = %e, %date, "Failed to fetch scoreboard");
                sleep(pause).await;
                continue;
            }
        };
        sleep(pause).await;

        for sched in &scheduled {
            let game = game_repo::upsert_game(
                pool,
                &sched.external_id,
                &team_name(sched.home_team_id),
                &team_name(sched.away_team_id),
                sched.commence_time,
            )
            .await?;

            // Final games belong to the grading sweep; regenerating their
            // projections would only churn stats requests.
            if sched.is_final() {
                tracing::debug!(game = %game.matchup(), "Game already final, skipping projections");
                outcome.games_updated += 1;
                continue;
            }

            tracing::info!(game = %game.matchup(), "Refreshing projections");

            prop_repo::delete_untouched_props(pool, game.id).await?;

            let players =
                match board_players(stats, sched.home_team_id, sched.away_team_id, config).await {
                    Ok(players) => players,
                    Err(e) => {
                        tracing::warn!(error = %e, game = %game.matchup(), "Failed to fetch rosters");
                        continue;
                    }
                };

            for player in &players {
                let log = match stats
                    .player_game_log(player.player_id, &config.season, GAME_LOG_WINDOW)
                    .await
                {
                    Ok(log) => log,
                    Err(e) => {
                        tracing::warn!(error = %e, player = %player.player_name, "Failed to fetch game log");
                        sleep(pause).await;
                        continue;
                    }
                };
                sleep(pause).await;

                for projected in project_player(&log) {
                    prop_repo::create_prop(
                        pool,
                        game.id,
                        &player.player_name,
                        projected.prop_type,
                        projected.line,
                        PROJECTION_ODDS,
                        PROJECTION_ODDS,
                        PROJECTION_BOOKMAKER,
                    )
                    .await?;
                    outcome.props_written += 1;
                }
            }

            outcome.games_updated += 1;
        }
    }

    let upcoming = game_repo::get_upcoming_games(pool, config.schedule_days_ahead).await?;
    gauge!("upcoming_games").set(upcoming.len() as f64);

    tracing::info!(
        games = outcome.games_updated,
        props = outcome.props_written,
        "Board refresh finished"
    );

    Ok(outcome)
}

/// Top of both rosters, capped per side; bench players rarely clear the
/// publish floors anyway.
async fn board_players(
    stats: &StatsClient,
    home_team_id: i64,
    away_team_id: i64,
    config: &AppConfig,
) -> anyhow::Result<Vec<RosterPlayer>> {
    let pause = Duration::from_millis(config.stats_rate_limit_ms);

    let mut home = stats.team_roster(home_team_id, &config.season).await?;
    sleep(pause).await;
    let mut away = stats.team_roster(away_team_id, &config.season).await?;
    sleep(pause).await;

    home.truncate(config.roster_players_per_team);
    away.truncate(config.roster_players_per_team);
    home.extend(away);

    Ok(home)
}

/// Periodic board refresh loop.
pub async fn run_board_refresher(pool: PgPool, stats: StatsClient, config: AppConfig) {
    let mut ticker = interval(Duration::from_secs(config.board_refresh_interval_secs));

    loop {
        ticker.tick().await;

        tracing::info!("Board refresher: fetching schedule");
        if let Err(e) = refresh_board(&pool, &stats, &config).await {
            tracing::error!(error = %e, "Board refresh failed");
        }
    }
}
