pub mod stats_client;
pub mod teams;

pub use stats_client::{
    GameLogLine, PlayerLine, RosterPlayer, ScheduledGame, StatsClient, StatsClientError,
    GAME_STATUS_FINAL,
};
pub use teams::team_name;
