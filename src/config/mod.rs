use std::env;

const DEFAULT_STATS_BASE_URL: &str = "https://stats.nba.com/stats";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // stats.nba.com
    pub stats_base_url: String,
    pub season: String,
    /// Delay between successive stats requests, to stay inside the
    /// endpoint's unofficial request budget.
    pub stats_rate_limit_ms: u64,

    // Board refresh
    pub schedule_days_ahead: u32,
    pub roster_players_per_team: usize,
    pub board_refresh_enabled: bool,
    pub board_refresh_interval_secs: u64,

    // Grading sweep
    pub grading_sweep_enabled: bool,
    pub grading_sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            stats_base_url: env::var("NBA_STATS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_STATS_BASE_URL.into()),
            season: env::var("NBA_SEASON").unwrap_or_else(|_| "2024-25".into()),
            stats_rate_limit_ms: env::var("STATS_RATE_LIMIT_MS")
                .unwrap_or_else(|_| "600".into())
                .parse()
                .unwrap_or(600),

            schedule_days_ahead: env::var("SCHEDULE_DAYS_AHEAD")
                .unwrap_or_else(|_| "14".into())
                .parse()
                .unwrap_or(14),
            roster_players_per_team: env::var("ROSTER_PLAYERS_PER_TEAM")
                .unwrap_or_else(|_| "6".into())
                .parse()
                .unwrap_or(6),
            board_refresh_enabled: env::var("BOARD_REFRESH_ENABLED")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            board_refresh_interval_secs: env::var("BOARD_REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "43200".into())
                .parse()
                .unwrap_or(43_200),

            grading_sweep_enabled: env::var("GRADING_SWEEP_ENABLED")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            grading_sweep_interval_secs: env::var("GRADING_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "900".into())
                .parse()
                .unwrap_or(900),
        })
    }
}
