//! # Safari: exact capture probability for scripted Safari Zone encounters
//!
//! Given a species' catch and flee rates and a fixed turn-by-turn plan of
//! balls, bait and rocks, computes the exact probability that the plan ends
//! in a capture. Nothing is sampled: every branch of the handheld's RNG is
//! enumerated and weighted.
//!
//! ## Algorithm overview
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | 0 | [`tables`] | Build Stay/Flee, Catch/Miss and throw-counter tables from the 16-bit RNG's residue counts and the fixed-point ball formula |
//! | 1 | [`state`] | Derive catch/escape factors from the rates; apply bait, rock and watch transitions |
//! | 2 | [`engine`] | Expand every turn outcome of the script depth-first, fold leaf probabilities into caught / fled / unresolved |
//!
//! ## Probability backends
//!
//! [`probability::Prob64`] (f64) is the default. [`probability::Prob128`]
//! is a 128-bit fixed-point value used to confirm that f64 rounding does not
//! move the headline number.
//!
//! ## Reference-platform quirks reproduced
//!
//! - `rand16 % 100` favours residues 0..=35 (656 vs 655 occurrences).
//! - `rand16 % 5` favours residue 0 (13108 vs 13107).
//! - The BIOS square root truncates to 16 bits, twice, inside the ball formula.

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod constants;
pub mod engine;
pub mod env_config;
pub mod error;
pub mod probability;
pub mod script;
pub mod state;
pub mod tables;
pub mod types;

pub use config::{EncounterConfig, Species};
pub use engine::{capture_probability, Outcome, Solution, Solver};
pub use error::{ConfigError, ScriptError, SolveError};
pub use probability::{Prob128, Prob64, Probability};
pub use script::ActionScript;
pub use state::InteractionState;
pub use types::{FleeTiming, PlayerAction, Reaction};
