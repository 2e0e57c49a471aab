//! Probability values and their two numeric backends.
//!
//! The enumeration only ever multiplies independent events and adds disjoint
//! ones, starting from the constants 0 and 1 and from ratios `k / 65536` read
//! off the RNG. [`Probability`] captures exactly that algebra; the engine and
//! the tables are generic over it.
//!
//! | Backend | Representation | Use |
//! |---|---|---|
//! | [`Prob64`] | IEEE-754 double | default, fast |
//! | [`Prob128`] | unsigned 4.124 fixed point in a `u128` | extended precision, cross-check |
//!
//! Every `k / 65536` ratio is exact in both backends. `Prob128` multiplication
//! truncates below 2^-124, so long paths lose at most a few ulps each.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

use crate::tables::ProbTables;

/// A probability in [0, 1] with the operations the enumeration needs.
///
/// `*` is the joint probability of independent events, `+` the probability of
/// either of two disjoint events.
pub trait Probability:
    Copy
    + Send
    + Sync
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Serialize
    + Add<Output = Self>
    + Mul<Output = Self>
    + Sum
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    /// Backend name used by logs and the driver's `--backend` flag.
    const NAME: &'static str;

    /// `num / den`. Callers guarantee `num <= den` except for the
    /// intermediate integer scaling done by [`Probability::times`].
    fn from_ratio(num: u32, den: u32) -> Self;

    /// `1 - self`.
    fn complement(self) -> Self;

    /// `self * n` for a small integer `n`.
    fn times(self, n: u32) -> Self;

    fn to_f64(self) -> f64;

    /// Process-wide slot holding this backend's lookup tables.
    fn table_cell() -> &'static OnceLock<ProbTables<Self>>;
}

// ── f64 backend ─────────────────────────────────────────────────────────

/// Double-precision probability.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Prob64(f64);

static PROB64_TABLES: OnceLock<ProbTables<Prob64>> = OnceLock::new();

impl Probability for Prob64 {
    const ZERO: Self = Prob64(0.0);
    const ONE: Self = Prob64(1.0);
    const NAME: &'static str = "f64";

    #[inline]
    fn from_ratio(num: u32, den: u32) -> Self {
        Prob64(num as f64 / den as f64)
    }

    #[inline]
    fn complement(self) -> Self {
        Prob64(1.0 - self.0)
    }

    #[inline]
    fn times(self, n: u32) -> Self {
        Prob64(self.0 * n as f64)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.0
    }

    fn table_cell() -> &'static OnceLock<ProbTables<Self>> {
        &PROB64_TABLES
    }
}

impl Add for Prob64 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Prob64(self.0 + rhs.0)
    }
}

impl Mul for Prob64 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Prob64(self.0 * rhs.0)
    }
}

impl Sum for Prob64 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Prob64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Prob64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

// ── 128-bit fixed-point backend ─────────────────────────────────────────

const FRAC_BITS: u32 = 124;
const FRAC_MASK: u128 = (1u128 << FRAC_BITS) - 1;
const LOW64: u128 = u64::MAX as u128;

/// Extended-precision probability: unsigned fixed point, 4 integer bits and
/// 124 fractional bits.
///
/// The integer bits only give headroom for [`Probability::times`]; every value
/// the engine produces stays in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prob128(u128);

static PROB128_TABLES: OnceLock<ProbTables<Prob128>> = OnceLock::new();

impl Prob128 {
    /// Raw fixed-point bits (value = bits / 2^124).
    pub fn to_bits(self) -> u128 {
        self.0
    }
}

/// Full 256-bit product of two `u128`s as `(high, low)`.
#[inline]
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    let (ah, al) = (a >> 64, a & LOW64);
    let (bh, bl) = (b >> 64, b & LOW64);

    let ll = al * bl;
    let lh = al * bh;
    let hl = ah * bl;
    let hh = ah * bh;

    // Sum of three values below 2^64 each: no overflow.
    let mid = (ll >> 64) + (lh & LOW64) + (hl & LOW64);
    let low = (ll & LOW64) | ((mid & LOW64) << 64);
    let high = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (high, low)
}

impl Probability for Prob128 {
    const ZERO: Self = Prob128(0);
    const ONE: Self = Prob128(1u128 << FRAC_BITS);
    const NAME: &'static str = "fixed128";

    fn from_ratio(num: u32, den: u32) -> Self {
        debug_assert!(den != 0, "zero denominator");
        let (num, den) = (num as u128, den as u128);
        let whole = num / den;
        let rem = num % den;
        // floor(rem * 2^124 / den) in two steps; den < 2^32 keeps both in range.
        let q1 = (rem << 64) / den;
        let r1 = (rem << 64) % den;
        let q2 = (r1 << 60) / den;
        Prob128((whole << FRAC_BITS) + (q1 << 60) + q2)
    }

    #[inline]
    fn complement(self) -> Self {
        Prob128(Self::ONE.0.saturating_sub(self.0))
    }

    #[inline]
    fn times(self, n: u32) -> Self {
        Prob128(self.0 * n as u128)
    }

    fn to_f64(self) -> f64 {
        self.0 as f64 / (1u128 << FRAC_BITS) as f64
    }

    fn table_cell() -> &'static OnceLock<ProbTables<Self>> {
        &PROB128_TABLES
    }
}

impl Add for Prob128 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Prob128(self.0 + rhs.0)
    }
}

impl Mul for Prob128 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let (high, low) = mul_wide(self.0, rhs.0);
        Prob128((high << (128 - FRAC_BITS)) | (low >> FRAC_BITS))
    }
}

impl Sum for Prob128 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Exact decimal expansion, truncated to the requested precision (default 30).
impl fmt::Display for Prob128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(30);
        let mut out = (self.0 >> FRAC_BITS).to_string();
        if digits > 0 {
            out.push('.');
            let mut frac = self.0 & FRAC_MASK;
            for _ in 0..digits {
                frac *= 10;
                out.push(char::from(b'0' + (frac >> FRAC_BITS) as u8));
                frac &= FRAC_MASK;
            }
        }
        f.write_str(&out)
    }
}

impl Serialize for Prob128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}
