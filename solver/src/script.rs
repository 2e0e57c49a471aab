//! Action scripts: the fixed turn-by-turn plan being evaluated.
//!
//! Written in letter notation: `T` bait (treat), `R` rock, `L` ball.
//! Letters are case-insensitive; whitespace, `,` and `-` are ignored so that
//! long plans can be grouped, e.g. `"TTLLL-TLLTLLL"`.

use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_SCRIPT_LEN, REFERENCE_PLAN};
use crate::error::ScriptError;
use crate::types::PlayerAction;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionScript {
    actions: Vec<PlayerAction>,
}

impl ActionScript {
    pub fn new(actions: Vec<PlayerAction>) -> Result<Self, ScriptError> {
        if actions.len() > MAX_SCRIPT_LEN {
            return Err(ScriptError::TooLong { len: actions.len() });
        }
        Ok(ActionScript { actions })
    }

    /// 43-turn plan with 30 balls.
    pub fn reference_plan() -> Self {
        ActionScript {
            actions: REFERENCE_PLAN
                .chars()
                .filter_map(PlayerAction::from_letter)
                .collect(),
        }
    }

    pub fn actions(&self) -> &[PlayerAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn ball_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|&&a| a == PlayerAction::Ball)
            .count()
    }

    /// Append balls until the script throws `balls` of them: the player keeps
    /// throwing once the plan runs out.
    pub fn pad_with_balls(mut self, balls: usize) -> Result<Self, ScriptError> {
        let missing = balls.saturating_sub(self.ball_count());
        self.actions
            .extend(std::iter::repeat(PlayerAction::Ball).take(missing));
        if self.actions.len() > MAX_SCRIPT_LEN {
            return Err(ScriptError::TooLong {
                len: self.actions.len(),
            });
        }
        Ok(self)
    }
}

impl FromStr for ActionScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut actions = Vec::with_capacity(s.len());
        for (position, letter) in s.chars().enumerate() {
            if letter.is_whitespace() || letter == ',' || letter == '-' {
                continue;
            }
            let action = PlayerAction::from_letter(letter)
                .ok_or(ScriptError::UnknownAction { letter, position })?;
            actions.push(action);
        }
        ActionScript::new(actions)
    }
}

impl fmt::Display for ActionScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            write!(f, "{}", action.letter())?;
        }
        Ok(())
    }
}

impl AsRef<[PlayerAction]> for ActionScript {
    fn as_ref(&self) -> &[PlayerAction] {
        &self.actions
    }
}
