pub mod game;
pub mod pick;
pub mod prop;

pub use game::Game;
pub use pick::{GradeState, Pick, PickDetail};
pub use prop::PlayerProp;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which side of the line a pick takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Over,
    Under,
}

impl Side {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "over" => Some(Side::Over),
            "under" => Some(Side::Under),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Over => "over",
            Side::Under => "under",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropKind
// ---------------------------------------------------------------------------

/// Statistic category a prop is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Points,
    Rebounds,
    Assists,
}

impl PropKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "points" => Some(PropKind::Points),
            "rebounds" => Some(PropKind::Rebounds),
            "assists" => Some(PropKind::Assists),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropKind::Points => "points",
            PropKind::Rebounds => "rebounds",
            PropKind::Assists => "assists",
        }
    }
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Terminal grading state of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
    Push,
}

impl Outcome {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "won" => Some(Outcome::Won),
            "lost" => Some(Outcome::Lost),
            "push" => Some(Outcome::Push),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Push => "push",
        }
    }

    /// Pushes count toward neither streaks nor win rate.
    pub fn is_decided(&self) -> bool {
        matches!(self, Outcome::Won | Outcome::Lost)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
