//! Action and reaction vocabulary shared by the state model and the engine.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// What the player does on a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Ball,
    Bait,
    Rock,
}

impl PlayerAction {
    /// Script letter: `L` ball, `T` bait (treat), `R` rock.
    pub fn letter(self) -> char {
        match self {
            PlayerAction::Ball => 'L',
            PlayerAction::Bait => 'T',
            PlayerAction::Rock => 'R',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(PlayerAction::Ball),
            'T' => Some(PlayerAction::Bait),
            'R' => Some(PlayerAction::Rock),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerAction::Ball => "Ball",
            PlayerAction::Bait => "Bait",
            PlayerAction::Rock => "Rock",
        })
    }
}

/// How the entity ends a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// Terminal: the encounter ends without capture.
    Flee,
    /// The encounter continues; bait/rock counters tick down.
    WatchCarefully,
    /// Terminal: the ball succeeded.
    Caught,
}

impl Reaction {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Reaction::WatchCarefully)
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reaction::Flee => "Flee",
            Reaction::WatchCarefully => "Watch",
            Reaction::Caught => "Caught",
        })
    }
}

/// Which counters the flee roll of a bait/rock turn is made against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FleeTiming {
    /// After the realized counter of this turn's throw is applied.
    #[default]
    AfterThrow,
    /// Before the throw, as the handheld orders a turn.
    BeforeThrow,
}

impl std::str::FromStr for FleeTiming {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "after" | "after-throw" => Ok(FleeTiming::AfterThrow),
            "before" | "before-throw" => Ok(FleeTiming::BeforeThrow),
            _ => Err(ConfigError::UnknownFleeTiming {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        for action in [PlayerAction::Ball, PlayerAction::Bait, PlayerAction::Rock] {
            assert_eq!(PlayerAction::from_letter(action.letter()), Some(action));
        }
        assert_eq!(PlayerAction::from_letter('t'), Some(PlayerAction::Bait));
        assert_eq!(PlayerAction::from_letter('B'), None);
    }

    #[test]
    fn test_terminal_reactions() {
        assert!(Reaction::Flee.is_terminal());
        assert!(Reaction::Caught.is_terminal());
        assert!(!Reaction::WatchCarefully.is_terminal());
    }

    #[test]
    fn test_flee_timing_parse() {
        assert_eq!("after".parse::<FleeTiming>(), Ok(FleeTiming::AfterThrow));
        assert_eq!("BEFORE".parse::<FleeTiming>(), Ok(FleeTiming::BeforeThrow));
        assert!("sometimes".parse::<FleeTiming>().is_err());
    }
}
