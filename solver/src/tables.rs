//! Discrete probability tables, built once per backend.
//!
//! Three tables quantize the handheld's 16-bit RNG:
//!
//! 1. **Stay/Flee**: row `r` = P(`rand16 % 100 >= r`), P(`rand16 % 100 < r`).
//!    65536 is not a multiple of 100, so residues 0..=35 occur 656 times and
//!    36..=99 occur 655 times. The count is accumulated residue by residue.
//! 2. **Catch/Miss**: row `f` = P(all four shake checks pass) for the Safari
//!    Ball formula at catch factor `f`, replicating the truncating integer
//!    square roots of the reference platform.
//! 3. **Throw counter**: for a bait/rock counter `c`, the distribution of the
//!    counter after one more throw: `min(c + rand16 % 5 + 2, 6)`. Residue 0 of
//!    `% 5` occurs 13108 times, residues 1..=4 occur 13107 times.
//!
//! The integer helpers ([`uint16_residue_count`], [`flee_roll_count`],
//! [`ball_odds`], [`shake_odds`]) are backend-independent; [`ProbTables::build`]
//! turns their counts into [`Probability`] values.

use std::time::Instant;

use crate::constants::*;
use crate::probability::Probability;

/// One Stay/Flee row. `stay + flee == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StayFlee<P> {
    pub stay: P,
    pub flee: P,
}

/// One Catch/Miss row. `catch + miss == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatchMiss<P> {
    pub catch: P,
    pub miss: P,
}

/// Distribution of a bait/rock counter after one throw: `(realized value, probability)`
/// pairs in increasing value order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowOutcomes<P> {
    entries: [(u8, P); THROW_ROLL_MODULUS as usize],
    len: usize,
}

impl<P: Probability> ThrowOutcomes<P> {
    /// Group the five `% 5` residues by the counter value they produce.
    fn for_counter(counter: u8) -> Self {
        let mut entries = [(0u8, P::ZERO); THROW_ROLL_MODULUS as usize];
        let mut counts = [0u32; THROW_ROLL_MODULUS as usize];
        let mut len = 0usize;

        for residue in 0..THROW_ROLL_MODULUS {
            let value = (counter as u32 + residue + THROW_MIN_INCREMENT as u32)
                .min(MAX_THROW_COUNTER as u32) as u8;
            let count = uint16_residue_count(THROW_ROLL_MODULUS, residue);
            if len > 0 && entries[len - 1].0 == value {
                counts[len - 1] += count;
            } else {
                entries[len].0 = value;
                counts[len] = count;
                len += 1;
            }
        }
        for i in 0..len {
            entries[i].1 = P::from_ratio(counts[i], RNG_RANGE);
        }
        ThrowOutcomes { entries, len }
    }

    pub fn as_slice(&self) -> &[(u8, P)] {
        &self.entries[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, P)> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// All precomputed lookup tables for one probability backend.
///
/// Immutable after [`ProbTables::build`]; shared across rayon workers by
/// reference (see [`tables`]).
pub struct ProbTables<P> {
    /// Indexed by flee rate in percent (0..=255; only 0..=100 reachable).
    pub stay_flee: [StayFlee<P>; TABLE_SIZE],
    /// Indexed by catch factor (0..=255; only 0..=20 reachable).
    pub catch_miss: [CatchMiss<P>; TABLE_SIZE],
    /// Indexed by bait/rock counter before the throw (0..=6).
    pub throws: [ThrowOutcomes<P>; MAX_THROW_COUNTER as usize + 1],
}

impl<P: Probability> ProbTables<P> {
    pub fn build() -> Self {
        let start = Instant::now();
        let tables = ProbTables {
            stay_flee: std::array::from_fn(|rate| stay_flee_row(rate as u32)),
            catch_miss: std::array::from_fn(|factor| catch_miss_row(factor as u32)),
            throws: std::array::from_fn(|counter| ThrowOutcomes::for_counter(counter as u8)),
        };
        tracing::debug!(
            backend = P::NAME,
            elapsed_us = start.elapsed().as_micros() as u64,
            "built probability tables"
        );
        tables
    }

    #[inline]
    pub fn stay_flee(&self, flee_percent: u8) -> StayFlee<P> {
        self.stay_flee[flee_percent as usize]
    }

    #[inline]
    pub fn catch_miss(&self, catch_factor: u8) -> CatchMiss<P> {
        self.catch_miss[catch_factor as usize]
    }

    #[inline]
    pub fn throw_outcomes(&self, counter: u8) -> &ThrowOutcomes<P> {
        &self.throws[counter.min(MAX_THROW_COUNTER) as usize]
    }
}

/// Tables for backend `P`, built on first use and then shared for the
/// lifetime of the process.
pub fn tables<P: Probability>() -> &'static ProbTables<P> {
    P::table_cell().get_or_init(ProbTables::build)
}

// ── Integer model of the reference platform ─────────────────────────────

/// How many of the 65536 16-bit values `v` satisfy `v % modulus == residue`.
pub fn uint16_residue_count(modulus: u32, residue: u32) -> u32 {
    debug_assert!(residue < modulus);
    RNG_RANGE / modulus + u32::from(residue < RNG_RANGE % modulus)
}

/// How many 16-bit values make the flee roll `v % 100 < rate` succeed.
///
/// Rates of 100 and above cover every residue (count 65536).
pub fn flee_roll_count(rate: u32) -> u32 {
    (0..rate.min(FLEE_ROLL_MODULUS))
        .map(|residue| uint16_residue_count(FLEE_ROLL_MODULUS, residue))
        .sum()
}

/// Square root as done by the reference BIOS: result truncated to 16 bits.
#[inline]
pub fn gba_sqrt(value: u32) -> u16 {
    (value as f64).sqrt() as u16
}

/// Safari Ball odds for a catch factor: `factor * 1275 / 100 * 15 / 30`,
/// every division truncating.
pub fn ball_odds(catch_factor: u32) -> u32 {
    let catch_rate = catch_factor * FACTOR_DENOMINATOR / FACTOR_NUMERATOR;
    catch_rate * BALL_MULTIPLIER / BALL_MULTIPLIER_DIVISOR
}

/// Per-check success odds of one ball throw, out of 65536.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShakeOdds {
    /// Odds above 254: captured without any shake check.
    Certain,
    /// Odds of zero: the ball always misses.
    Impossible,
    /// Each of the four checks passes when `rand16 < threshold`.
    PerCheck(u32),
}

pub fn shake_odds(catch_factor: u32) -> ShakeOdds {
    let odds = ball_odds(catch_factor);
    if odds > MAX_BALL_ODDS {
        return ShakeOdds::Certain;
    }
    if odds == 0 {
        return ShakeOdds::Impossible;
    }
    let root = gba_sqrt(gba_sqrt(SHAKE_ODDS_NUMERATOR / odds) as u32);
    ShakeOdds::PerCheck(SHAKE_ODDS_SCALE / root as u32)
}

fn stay_flee_row<P: Probability>(rate: u32) -> StayFlee<P> {
    let count = flee_roll_count(rate);
    StayFlee {
        stay: P::from_ratio(RNG_RANGE - count, RNG_RANGE),
        flee: P::from_ratio(count, RNG_RANGE),
    }
}

fn catch_miss_row<P: Probability>(catch_factor: u32) -> CatchMiss<P> {
    match shake_odds(catch_factor) {
        ShakeOdds::Certain => CatchMiss {
            catch: P::ONE,
            miss: P::ZERO,
        },
        ShakeOdds::Impossible => CatchMiss {
            catch: P::ZERO,
            miss: P::ONE,
        },
        ShakeOdds::PerCheck(threshold) => {
            let check = P::from_ratio(threshold, RNG_RANGE);
            let catch = (0..SHAKE_CHECKS).fold(P::ONE, |acc, _| acc * check);
            CatchMiss {
                catch,
                miss: catch.complement(),
            }
        }
    }
}
