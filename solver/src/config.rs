//! Encounter configuration: species rates, flee-check timing, ball supply.
//!
//! An [`EncounterConfig`] is built once, validated, and then passed by
//! reference into [`crate::state::InteractionState::new`] and the solver.
//! Nothing in the crate reads rates from global state.

use serde::Serialize;

use crate::constants::SAFARI_BALLS;
use crate::error::ConfigError;
use crate::types::FleeTiming;

/// Catch and flee rates of a Safari Zone species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Species {
    pub name: &'static str,
    pub catch_rate: u8,
    pub flee_rate: u8,
}

pub const CHANSEY: Species = Species {
    name: "chansey",
    catch_rate: 30,
    flee_rate: 125,
};

/// Known species presets, looked up by `--species`.
pub const SPECIES: &[Species] = &[CHANSEY];

impl Species {
    pub fn by_name(name: &str) -> Result<Species, ConfigError> {
        SPECIES
            .iter()
            .copied()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownSpecies {
                name: name.to_string(),
            })
    }
}

/// Immutable parameters of one evaluated encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EncounterConfig {
    pub catch_rate: u8,
    pub flee_rate: u8,
    pub flee_timing: FleeTiming,
    /// Encounter ends (unresolved) once this many balls were thrown.
    pub ball_limit: Option<u32>,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::for_species(CHANSEY)
    }
}

impl EncounterConfig {
    pub fn new(catch_rate: u8, flee_rate: u8) -> Self {
        EncounterConfig {
            catch_rate,
            flee_rate,
            flee_timing: FleeTiming::default(),
            ball_limit: None,
        }
    }

    pub fn for_species(species: Species) -> Self {
        Self::new(species.catch_rate, species.flee_rate)
    }

    pub fn with_flee_timing(mut self, flee_timing: FleeTiming) -> Self {
        self.flee_timing = flee_timing;
        self
    }

    pub fn with_ball_limit(mut self, ball_limit: Option<u32>) -> Self {
        self.ball_limit = ball_limit;
        self
    }

    /// The handheld's own supply of 30 Safari Balls.
    pub fn with_safari_balls(self) -> Self {
        self.with_ball_limit(Some(SAFARI_BALLS))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catch_rate == 0 {
            return Err(ConfigError::ZeroCatchRate);
        }
        if self.flee_rate == 0 {
            return Err(ConfigError::ZeroFleeRate);
        }
        if self.ball_limit == Some(0) {
            return Err(ConfigError::ZeroBallLimit);
        }
        Ok(())
    }
}
