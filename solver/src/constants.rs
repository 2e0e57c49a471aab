//! Reference-platform constants.
//!
//! Everything the enumeration needs to reproduce the handheld's arithmetic
//! bit for bit:
//! - the 16-bit RNG range whose residues are *not* uniform modulo 100 or 5
//! - the fixed-point Safari Ball formula (1275/100 scaling, ball multiplier 15,
//!   the two truncating square roots, four shake checks)
//! - the counter and factor bounds applied by bait and rock throws
//!
//! All tables in [`crate::tables`] are pure functions of these values.

/// Number of distinct values produced by one 16-bit RNG draw.
pub const RNG_RANGE: u32 = 1 << 16;

/// Number of rows in each lookup table (indexed by an 8-bit parameter).
pub const TABLE_SIZE: usize = 256;

/// Modulus of the flee roll: the entity flees when `rand16 % 100 < rate`.
pub const FLEE_ROLL_MODULUS: u32 = 100;

/// Modulus of the bait/rock counter draw: `counter += rand16 % 5 + 2`.
pub const THROW_ROLL_MODULUS: u32 = 5;

/// Smallest counter increment of a bait or rock throw.
pub const THROW_MIN_INCREMENT: u8 = 2;

/// Bait and rock counters saturate here.
pub const MAX_THROW_COUNTER: u8 = 6;

/// Rate <-> factor scaling: `factor = rate * 100 / 1275`.
pub const FACTOR_NUMERATOR: u32 = 100;
pub const FACTOR_DENOMINATOR: u32 = 1275;

/// Safari Ball catch-rate multiplier (x1.5, expressed over [`BALL_MULTIPLIER_DIVISOR`]).
pub const BALL_MULTIPLIER: u32 = 15;
pub const BALL_MULTIPLIER_DIVISOR: u32 = 30;

/// Odds above this are a guaranteed capture.
pub const MAX_BALL_ODDS: u32 = 254;

/// `0xFF0000`: numerator of the first shake-odds square root.
pub const SHAKE_ODDS_NUMERATOR: u32 = 16_711_680;

/// `0xFFFF0`: numerator of the final shake-odds rescale.
pub const SHAKE_ODDS_SCALE: u32 = 1_048_560;

/// Independent shake checks a ball must pass (three shakes plus the click).
pub const SHAKE_CHECKS: usize = 4;

/// Escape factor floor applied at construction.
pub const MIN_ESCAPE_FACTOR: u8 = 2;

/// Catch factor floor after bait halves it.
pub const MIN_BAITED_CATCH_FACTOR: u8 = 3;

/// Catch factor cap after a rock doubles it.
pub const MAX_ROCKED_CATCH_FACTOR: u8 = 20;

/// Effective flee rate cap while the entity is angry (rock counter set).
pub const MAX_ANGRY_FLEE_RATE: u8 = 20;

/// Effective flee rate floor while the entity is eating (bait counter set).
pub const MIN_EATING_FLEE_RATE: u8 = 1;

/// Effective flee rate -> Stay/Flee table row.
pub const FLEE_RATE_TO_PERCENT: u8 = 5;

/// Longest accepted action script, in turns.
pub const MAX_SCRIPT_LEN: usize = 64;

/// Number of balls handed out at the Safari Zone gate.
pub const SAFARI_BALLS: u32 = 30;

/// Reference plan evaluated by the driver: 43 turns, 30 balls.
pub const REFERENCE_PLAN: &str = "TTLLLTLLTLLLTLLTLLLTLLTLLLTLLTLLLTLLTLLLLRL";

/// Script of the end-to-end scenario: bait, bait, then three balls.
pub const SHORT_PLAN: &str = "TTLLL";
