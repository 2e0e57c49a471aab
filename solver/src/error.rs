//! Error types.
//!
//! The enumeration itself cannot fail. Errors come from validating the
//! encounter configuration and the action script before a solve starts, and
//! from writing the optional per-node trace.

use thiserror::Error;

use crate::constants::MAX_SCRIPT_LEN;

/// Invalid encounter configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("catch rate must be at least 1")]
    ZeroCatchRate,

    #[error("flee rate must be at least 1")]
    ZeroFleeRate,

    #[error("ball limit must be at least 1")]
    ZeroBallLimit,

    #[error("unknown species '{name}'")]
    UnknownSpecies { name: String },

    #[error("unknown flee timing '{value}' (expected after|before)")]
    UnknownFleeTiming { value: String },
}

/// Malformed action script.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown action '{letter}' at position {position} (expected T, R or L)")]
    UnknownAction { letter: char, position: usize },

    #[error("script has {len} turns, maximum is {max}", max = MAX_SCRIPT_LEN)]
    TooLong { len: usize },
}

/// Anything that stops a solve.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("failed to write trace: {0}")]
    Trace(#[from] std::io::Error),
}
