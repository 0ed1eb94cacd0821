pub mod grade;
pub mod record;

pub use grade::{grade, GradeSummary};
pub use record::{rank_users, streak, win_rate, LeaderboardEntry, Record, UserOutcomes};
