use rust_decimal::Decimal;

use crate::models::PropKind;
use crate::nba::GameLogLine;

/// Projection props carry flat juice on both sides.
pub const PROJECTION_ODDS: i32 = -110;
pub const PROJECTION_BOOKMAKER: &str = "projection";

/// A derived (stat, line) pair for one player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedProp {
    pub prop_type: PropKind,
    pub line: Decimal,
}

/// Rolling average over the valid samples, rounded to the nearest 0.5.
/// None when no valid samples exist.
pub fn projection_line(samples: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut count = 0u32;
    for sample in samples {
        if sample >= Decimal::ZERO {
            sum += sample;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let avg = sum / Decimal::from(count);
    Some((avg * Decimal::TWO).round() / Decimal::TWO)
}

/// Lines at or below these averages aren't worth publishing.
fn min_line(kind: PropKind) -> Decimal {
    match kind {
        PropKind::Points => Decimal::from(5),
        PropKind::Rebounds => Decimal::TWO,
        PropKind::Assists => Decimal::ONE,
    }
}

/// Derive publishable props from a player's recent game log.
pub fn project_player(log: &[GameLogLine]) -> Vec<ProjectedProp> {
    let mut props = Vec::with_capacity(3);

    let stats = [
        (PropKind::Points, log.iter().filter_map(|g| g.points).collect::<Vec<_>>()),
        (PropKind::Rebounds, log.iter().filter_map(|g| g.rebounds).collect()),
        (PropKind::Assists, log.iter().filter_map(|g| g.assists).collect()),
    ];

    for (kind, samples) in stats {
        if let Some(line) = projection_line(samples) {
            if line > min_line(kind) {
                props.push(ProjectedProp { prop_type: kind, line });
            }
        }
    }

    props
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_projection_line_rounds_to_half() {
        // avg of 24, 25, 27 = 25.333 -> 25.5
        let line = projection_line([dec!(24), dec!(25), dec!(27)]).unwrap();
        assert_eq!(line, dec!(25.5));
    }

    #[test]
    fn test_projection_line_ignores_negative_samples() {
        let line = projection_line([dec!(10), dec!(-1), dec!(20)]).unwrap();
        assert_eq!(line, dec!(15.0));
    }

    #[test]
    fn test_projection_line_empty() {
        assert_eq!(projection_line([]), None);
        assert_eq!(projection_line([dec!(-5)]), None);
    }

    fn log_line(pts: i64, reb: i64, ast: i64) -> GameLogLine {
        GameLogLine {
            points: Some(Decimal::from(pts)),
            rebounds: Some(Decimal::from(reb)),
            assists: Some(Decimal::from(ast)),
        }
    }

    #[test]
    fn test_project_player_filters_thin_lines() {
        // 4 points avg is below the publish floor; 8 rebounds and 6 assists pass
        let log = vec![log_line(4, 8, 6), log_line(4, 8, 6)];
        let props = project_player(&log);

        assert_eq!(props.len(), 2);
        assert_eq!(props[0].prop_type, PropKind::Rebounds);
        assert_eq!(props[0].line, dec!(8.0));
        assert_eq!(props[1].prop_type, PropKind::Assists);
    }

    #[test]
    fn test_project_player_empty_log() {
        assert!(project_player(&[]).is_empty());
    }

    #[test]
    fn test_project_player_skips_missing_stat() {
        let log = vec![GameLogLine {
            points: Some(dec!(22)),
            rebounds: None,
            assists: None,
        }];
        let props = project_player(&log);

        assert_eq!(props.len(), 1);
        assert_eq!(props[0].prop_type, PropKind::Points);
        assert_eq!(props[0].line, dec!(22.0));
    }
}
