use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Outcome;

/// Won/lost/push tallies for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub won: u32,
    pub lost: u32,
    pub push: u32,
}

impl Record {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        let mut record = Record::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Won => record.won += 1,
                Outcome::Lost => record.lost += 1,
                Outcome::Push => record.push += 1,
            }
        }
        record
    }

    pub fn total(&self) -> u32 {
        self.won + self.lost + self.push
    }

    pub fn decided(&self) -> u32 {
        self.won + self.lost
    }
}

/// Win percentage in [0, 100], one decimal place. Zero when nothing decided.
pub fn win_rate(won: u32, lost: u32) -> Decimal {
    let decided = won + lost;
    if decided == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(won) * Decimal::ONE_HUNDRED / Decimal::from(decided)).round_dp(1)
}

/// Signed run length of identical decided outcomes, most recent first.
/// Positive for a win streak, negative for a loss streak, zero when no
/// decided picks exist. Pushes are skipped without breaking the run.
pub fn streak(outcomes: &[Outcome]) -> i32 {
    let mut decided = outcomes.iter().filter(|o| o.is_decided());

    let Some(first) = decided.next() else {
        return 0;
    };

    let mut run: i32 = 1;
    for outcome in decided {
        if outcome == first {
            run += 1;
        } else {
            break;
        }
    }

    match first {
        Outcome::Won => run,
        Outcome::Lost => -run,
        Outcome::Push => unreachable!("pushes filtered above"),
    }
}

/// Streak rendered for API responses: "W3", "L2", or "0".
pub fn format_streak(streak: i32) -> String {
    match streak {
        0 => "0".into(),
        n if n > 0 => format!("W{n}"),
        n => format!("L{}", -n),
    }
}

/// One user's graded outcomes, most recent first, as fed to the leaderboard.
#[derive(Debug, Clone)]
pub struct UserOutcomes {
    pub user_id: String,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub push: u32,
    pub total: u32,
    pub win_rate: Decimal,
    pub streak: String,
    pub is_user: bool,
}

/// Rank users descending by (wins, win_rate) with a stable sort, so ties keep
/// their original encounter order. Users with no decided picks are dropped,
/// except the requesting user, who is appended with a zero record if absent.
pub fn rank_users(users: Vec<UserOutcomes>, requesting_user: Option<&str>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .filter_map(|user| {
            let record = Record::from_outcomes(&user.outcomes);
            if record.decided() == 0 {
                return None;
            }

            Some(LeaderboardEntry {
                user_id: user.user_id.clone(),
                rank: 0,
                wins: record.won,
                losses: record.lost,
                push: record.push,
                total: record.total(),
                win_rate: win_rate(record.won, record.lost),
                streak: format_streak(streak(&user.outcomes)),
                is_user: requesting_user == Some(user.user_id.as_str()),
            })
        })
        .collect();

    entries.sort_by(|a, b| (b.wins, b.win_rate).cmp(&(a.wins, a.win_rate)));

    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx as u32 + 1;
    }

    if let Some(user_id) = requesting_user {
        if !entries.iter().any(|e| e.user_id == user_id) {
            let rank = entries.len() as u32 + 1;
            entries.push(LeaderboardEntry {
                user_id: user_id.to_string(),
                rank,
                wins: 0,
                losses: 0,
                push: 0,
                total: 0,
                win_rate: Decimal::ZERO,
                streak: "0".into(),
                is_user: true,
            });
        }
    }

    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use Outcome::{Lost, Push, Won};

    #[test]
    fn test_win_rate_basic() {
        // 8-2 = 80.0%
        assert_eq!(win_rate(8, 2), dec!(80.0));
    }

    #[test]
    fn test_win_rate_rounds_to_one_decimal() {
        // 2/3 = 66.666... -> 66.7
        assert_eq!(win_rate(2, 1), dec!(66.7));
    }

    #[test]
    fn test_win_rate_zero_when_nothing_decided() {
        assert_eq!(win_rate(0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_win_rate_bounds() {
        assert_eq!(win_rate(5, 0), dec!(100.0));
        assert_eq!(win_rate(0, 5), Decimal::ZERO);
    }

    #[test]
    fn test_streak_run_of_wins() {
        // Most recent first: [won, won, lost, won] -> +2
        assert_eq!(streak(&[Won, Won, Lost, Won]), 2);
    }

    #[test]
    fn test_streak_single_when_recent_differ() {
        assert_eq!(streak(&[Won, Lost, Lost]), 1);
        assert_eq!(streak(&[Lost, Won, Won]), -1);
    }

    #[test]
    fn test_streak_ignores_pushes() {
        assert_eq!(streak(&[Push, Won, Push, Won, Lost]), 2);
    }

    #[test]
    fn test_streak_empty_and_all_pushes() {
        assert_eq!(streak(&[]), 0);
        assert_eq!(streak(&[Push, Push]), 0);
    }

    #[test]
    fn test_streak_loss_run() {
        assert_eq!(streak(&[Lost, Lost, Lost]), -3);
    }

    #[test]
    fn test_format_streak() {
        assert_eq!(format_streak(3), "W3");
        assert_eq!(format_streak(-2), "L2");
        assert_eq!(format_streak(0), "0");
    }

    fn user(id: &str, outcomes: Vec<Outcome>) -> UserOutcomes {
        UserOutcomes {
            user_id: id.into(),
            outcomes,
        }
    }

    #[test]
    fn test_rank_wins_beat_win_rate() {
        // 8W/2L (80%) outranks 5W/0L (100%): wins take priority over rate.
        let users = vec![
            user("perfect", vec![Won; 5]),
            user("grinder", {
                let mut v = vec![Won; 8];
                v.extend(vec![Lost; 2]);
                v
            }),
        ];

        let board = rank_users(users, None);
        assert_eq!(board[0].user_id, "grinder");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].user_id, "perfect");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn test_rank_ties_keep_encounter_order() {
        let users = vec![
            user("first", vec![Won, Lost]),
            user("second", vec![Lost, Won]),
        ];

        let board = rank_users(users, None);
        assert_eq!(board[0].user_id, "first");
        assert_eq!(board[1].user_id, "second");
    }

    #[test]
    fn test_rank_excludes_push_only_users() {
        let users = vec![user("pushes", vec![Push, Push]), user("winner", vec![Won])];

        let board = rank_users(users, None);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, "winner");
    }

    #[test]
    fn test_rank_appends_requesting_user_with_zero_record() {
        let users = vec![user("winner", vec![Won, Won])];

        let board = rank_users(users, Some("newbie"));
        assert_eq!(board.len(), 2);
        let me = &board[1];
        assert_eq!(me.user_id, "newbie");
        assert_eq!(me.rank, 2);
        assert_eq!(me.wins, 0);
        assert_eq!(me.win_rate, Decimal::ZERO);
        assert!(me.is_user);
    }

    #[test]
    fn test_rank_marks_requesting_user_in_place() {
        let users = vec![user("a", vec![Won]), user("b", vec![Won, Won])];

        let board = rank_users(users, Some("a"));
        let a = board.iter().find(|e| e.user_id == "a").unwrap();
        assert!(a.is_user);
        assert_eq!(a.rank, 2);
    }
}
