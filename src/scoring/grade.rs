use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Outcome, Side};

/// Grade a single pick against the observed statistic.
///
/// A landed line is a push regardless of side; otherwise the side must be on
/// the correct side of the line to win.
pub fn grade(side: Side, line: Decimal, actual: Decimal) -> Outcome {
    if actual == line {
        Outcome::Push
    } else if (side == Side::Over && actual > line) || (side == Side::Under && actual < line) {
        Outcome::Won
    } else {
        Outcome::Lost
    }
}

/// Per-game grading tallies. `not_found` counts picks whose player was absent
/// from the boxscore; those stay ungraded and can be retried later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub won: u32,
    pub lost: u32,
    pub push: u32,
    pub not_found: u32,
}

impl GradeSummary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => self.won += 1,
            Outcome::Lost => self.lost += 1,
            Outcome::Push => self.push += 1,
        }
    }

    /// Picks actually settled this run.
    pub fn graded(&self) -> u32 {
        self.won + self.lost + self.push
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_over_beats_line() {
        assert_eq!(grade(Side::Over, dec!(24.5), dec!(30)), Outcome::Won);
    }

    #[test]
    fn test_under_loses_above_line() {
        assert_eq!(grade(Side::Under, dec!(24.5), dec!(30)), Outcome::Lost);
    }

    #[test]
    fn test_under_wins_below_line() {
        assert_eq!(grade(Side::Under, dec!(7.5), dec!(4)), Outcome::Won);
    }

    #[test]
    fn test_over_loses_below_line() {
        assert_eq!(grade(Side::Over, dec!(7.5), dec!(4)), Outcome::Lost);
    }

    #[test]
    fn test_push_regardless_of_side() {
        assert_eq!(grade(Side::Over, dec!(10.0), dec!(10.0)), Outcome::Push);
        assert_eq!(grade(Side::Under, dec!(10.0), dec!(10.0)), Outcome::Push);
    }

    #[test]
    fn test_push_with_fractional_equality() {
        // 10 == 10.0 under Decimal semantics
        assert_eq!(grade(Side::Over, dec!(10.0), dec!(10)), Outcome::Push);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = GradeSummary::default();
        summary.record(Outcome::Won);
        summary.record(Outcome::Won);
        summary.record(Outcome::Lost);
        summary.record(Outcome::Push);
        summary.not_found += 1;

        assert_eq!(summary.won, 2);
        assert_eq!(summary.lost, 1);
        assert_eq!(summary.push, 1);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.graded(), 4);
    }
}
