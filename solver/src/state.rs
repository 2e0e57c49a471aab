//! Interaction state: the entity's internal counters between turns.
//!
//! A state is a 5-byte `Copy` value. Every transition returns a new state;
//! the engine gives each node its own copy, so no state is ever shared or
//! mutated after creation.
//!
//! Invariant: at most one of `bait_counter` / `rock_counter` is nonzero.

use crate::config::EncounterConfig;
use crate::constants::*;
use crate::probability::Probability;
use crate::tables::{CatchMiss, ProbTables, StayFlee};
use crate::types::{PlayerAction, Reaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InteractionState {
    /// Drives the Catch/Miss row. Halved by bait, doubled by rock.
    pub catch_factor: u8,
    /// Drives the Stay/Flee row. Fixed for the whole encounter.
    pub escape_factor: u8,
    /// Turns the entity keeps eating (0..=6).
    pub bait_counter: u8,
    /// Turns the entity stays angry (0..=6).
    pub rock_counter: u8,
    /// Catch factor restored when the rock counter runs out.
    base_catch_factor: u8,
}

/// `rate * 100 / 1275`, truncating.
#[inline]
pub fn rate_to_factor(rate: u8) -> u8 {
    (rate as u32 * FACTOR_NUMERATOR / FACTOR_DENOMINATOR) as u8
}

impl InteractionState {
    pub fn new(catch_rate: u8, flee_rate: u8) -> Self {
        let catch_factor = rate_to_factor(catch_rate);
        InteractionState {
            catch_factor,
            escape_factor: rate_to_factor(flee_rate).max(MIN_ESCAPE_FACTOR),
            bait_counter: 0,
            rock_counter: 0,
            base_catch_factor: catch_factor,
        }
    }

    pub fn from_config(config: &EncounterConfig) -> Self {
        Self::new(config.catch_rate, config.flee_rate)
    }

    pub fn base_catch_factor(&self) -> u8 {
        self.base_catch_factor
    }

    /// Counter that a throw of `action` builds on (0 for balls).
    pub fn counter_for(&self, action: PlayerAction) -> u8 {
        match action {
            PlayerAction::Bait => self.bait_counter,
            PlayerAction::Rock => self.rock_counter,
            PlayerAction::Ball => 0,
        }
    }

    /// Effective flee rate in percent: the Stay/Flee row this state reads.
    ///
    /// Angry entities flee at twice the escape factor (cap 20), eating ones at
    /// a quarter (floor 1); the result is scaled by 5.
    pub fn flee_percent(&self) -> u8 {
        let rate = if self.rock_counter != 0 {
            (self.escape_factor as u16 * 2).min(MAX_ANGRY_FLEE_RATE as u16) as u8
        } else if self.bait_counter != 0 {
            (self.escape_factor / 4).max(MIN_EATING_FLEE_RATE)
        } else {
            self.escape_factor
        };
        (rate as u16 * FLEE_RATE_TO_PERCENT as u16).min(u8::MAX as u16) as u8
    }

    #[inline]
    pub fn stay_flee<P: Probability>(&self, tables: &ProbTables<P>) -> StayFlee<P> {
        tables.stay_flee(self.flee_percent())
    }

    #[inline]
    pub fn catch_miss<P: Probability>(&self, tables: &ProbTables<P>) -> CatchMiss<P> {
        tables.catch_miss(self.catch_factor)
    }

    /// State after the player's action with its realized value.
    ///
    /// `value` is the new bait/rock counter; it is ignored for balls, whose
    /// outcome lives on the enumeration node.
    pub fn after_player_action(mut self, action: PlayerAction, value: u8) -> Self {
        match action {
            PlayerAction::Bait => {
                self.bait_counter = value.min(MAX_THROW_COUNTER);
                self.rock_counter = 0;
                self.catch_factor = (self.catch_factor >> 1).max(MIN_BAITED_CATCH_FACTOR);
            }
            PlayerAction::Rock => {
                self.rock_counter = value.min(MAX_THROW_COUNTER);
                self.bait_counter = 0;
                self.catch_factor = (self.catch_factor as u16 * 2)
                    .min(MAX_ROCKED_CATCH_FACTOR as u16) as u8;
            }
            PlayerAction::Ball => {}
        }
        self
    }

    /// State after the entity's reaction. Only watching ticks counters down;
    /// fleeing and being caught end the encounter at the node level.
    pub fn after_reaction(mut self, reaction: Reaction) -> Self {
        if reaction != Reaction::WatchCarefully {
            return self;
        }
        if self.rock_counter != 0 {
            self.rock_counter -= 1;
            if self.rock_counter == 0 {
                self.catch_factor = self.base_catch_factor;
            }
        } else if self.bait_counter != 0 {
            self.bait_counter -= 1;
        }
        self
    }

    /// At most one of the throw counters is set.
    pub fn counters_exclusive(&self) -> bool {
        self.bait_counter == 0 || self.rock_counter == 0
    }
}
