//! The `Decimal64` wrapper type: constants, classification, operators and trait
//! implementations over the raw 64-bit kernel.

use core::cmp::Ordering;
use core::fmt;
use core::num::FpCategory;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use crate::consts::{self, *};
use crate::convert;
use crate::ops;
use crate::round::{self, RoundType};
use crate::text::{self, ParseDecimalError};
use crate::unpacked::{canonize, unpack, Unpacked};
use crate::Rounding;

/// A 64-bit decimal floating point number (IEEE 754-2008 decimal64, BID encoding).
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Decimal64(u64);

impl Decimal64 {
    pub const ZERO: Self = Decimal64(consts::ZERO);
    pub const ONE: Self = Decimal64(consts::ZERO | 1);
    pub const TWO: Self = Decimal64(consts::ZERO | 2);
    pub const TEN: Self = Decimal64(consts::ZERO | 10);
    pub const HUNDRED: Self = Decimal64(consts::ZERO | 100);
    pub const THOUSAND: Self = Decimal64(consts::ZERO | 1000);
    pub const MILLION: Self = Decimal64(consts::ZERO | 1_000_000);
    /// `0.1`, which binary floating point cannot represent exactly
    pub const ONE_TENTH: Self = Decimal64(0x31A0_0000_0000_0001);
    pub const ONE_HUNDREDTH: Self = Decimal64(0x3180_0000_0000_0001);

    pub const NAN: Self = Decimal64(consts::NAN);
    pub const INFINITY: Self = Decimal64(consts::POSITIVE_INFINITY);
    pub const NEG_INFINITY: Self = Decimal64(consts::NEGATIVE_INFINITY);
    /// Largest finite value, `9999999999999999E+369`
    pub const MAX_VALUE: Self = Decimal64(consts::MAX_VALUE);
    /// Most negative finite value
    pub const MIN_VALUE: Self = Decimal64(consts::MIN_VALUE);
    /// Smallest positive non-zero value, `1E-398`
    pub const MIN_POSITIVE_VALUE: Self = Decimal64(consts::MIN_POSITIVE_VALUE);
    /// Largest negative non-zero value, `-1E-398`
    pub const MAX_NEGATIVE_VALUE: Self = Decimal64(consts::MAX_NEGATIVE_VALUE);

    /// Raw transmutation to the underlying bits.
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Raw transmutation from the underlying bits.
    pub const fn from_bits(bits: u64) -> Self {
        Decimal64(bits)
    }

    /// Returns `true` if this value is `NaN` or `sNaN` and `false` otherwise.
    pub fn is_nan(self) -> bool {
        (self.0 & NAN_MASK) == NAN_MASK
    }

    /// Returns `true` if this value is `sNaN` and `false` otherwise.
    pub fn is_snan(self) -> bool {
        self.is_nan() && (self.0 & SIGNALING_NAN_MASK) == SIGNALING_NAN_MASK
    }

    /// Returns `true` if this value is positive infinity or negative infinity and `false`
    /// otherwise.
    pub fn is_infinite(self) -> bool {
        (self.0 & NAN_MASK) == INFINITY_MASK
    }

    /// Returns `true` if this number is neither infinite nor `NaN`.
    pub fn is_finite(self) -> bool {
        (self.0 & INFINITY_MASK) != INFINITY_MASK
    }

    /// Returns `true` if this value is a zero of either sign.
    pub fn is_zero(self) -> bool {
        self.is_finite() && unpack(self.0).coefficient == 0
    }

    /// Returns `true` for any value greater than zero, including positive infinity.
    pub fn is_positive(self) -> bool {
        !self.is_nan() && !self.is_sign_negative() && !self.is_zero()
    }

    /// Returns `true` for any value less than zero, including negative infinity.
    pub fn is_negative(self) -> bool {
        !self.is_nan() && self.is_sign_negative() && !self.is_zero()
    }

    /// Returns `true` if the number is neither zero, infinite, [subnormal][subnormal], or
    /// `NaN`.
    ///
    /// [subnormal]: https://en.wikipedia.org/wiki/Denormal_number
    pub fn is_normal(self) -> bool {
        if !self.is_finite() {
            return false; // NaN or Infinite
        }
        let unpacked = unpack(self.0);
        if unpacked.coefficient == 0 {
            return false; // Zero or illegal
        }
        Self::is_normal_internal(unpacked)
    }

    /// Returns `true` if the number is [subnormal][subnormal].
    ///
    /// [subnormal]: https://en.wikipedia.org/wiki/Denormal_number
    pub fn is_subnormal(self) -> bool {
        if !self.is_finite() {
            return false;
        }
        let unpacked = unpack(self.0);
        if unpacked.coefficient == 0 {
            return false;
        }
        !Self::is_normal_internal(unpacked)
    }

    /// Returns the floating point category of the number. If only one property is going to
    /// be tested, it is generally faster to use the specific predicate instead.
    pub fn classify(self) -> FpCategory {
        if self.is_nan() {
            FpCategory::Nan
        } else if self.is_infinite() {
            FpCategory::Infinite
        } else {
            let unpacked = unpack(self.0);
            if unpacked.coefficient == 0 {
                FpCategory::Zero
            } else if Self::is_normal_internal(unpacked) {
                FpCategory::Normal
            } else {
                FpCategory::Subnormal
            }
        }
    }

    fn is_normal_internal(unpacked: Unpacked) -> bool {
        if unpacked.exponent >= (COEFFICIENT_SIZE - 1) as i32 {
            true
        } else {
            // Check if the coefficient is high enough for the exponent
            let coeff = unpacked
                .coefficient
                .checked_mul(POWERS_OF_TEN[unpacked.exponent as usize]);
            // If overflowed, then it's guaranteed to be a "normal" number
            coeff.map_or(true, |v| v >= MAXIMUM_COEFFICIENT / 10)
        }
    }

    /// Returns `true` if and only if `self` has a positive sign, including `+0.0`, `NaN`s
    /// with positive sign bit and positive infinity.
    pub fn is_sign_positive(self) -> bool {
        !self.is_sign_negative()
    }

    /// Returns `true` if and only if `self` has a negative sign, including `-0.0`, `NaN`s
    /// with negative sign bit and negative infinity.
    pub fn is_sign_negative(self) -> bool {
        (self.0 & SIGN_MASK) != 0
    }

    pub fn abs(self) -> Self {
        Decimal64(self.0 & !SIGN_MASK)
    }

    /// The canonical member of this value's cohort: trailing coefficient zeros shifted into
    /// the exponent, zeros and specials reduced to their canonical encodings.
    pub fn canonize(self) -> Self {
        Decimal64(canonize(self.0))
    }

    /// Total order over all values: cohort members compare equal, zeros of both signs are
    /// equal, NaN sorts above infinity and equals itself.
    pub fn compare(self, other: Self) -> Ordering {
        ops::compare(self.0, other.0)
    }

    /// The smaller of the two values; NaN wins over any other value.
    pub fn min(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        if ops::compare(self.0, other.0) == Ordering::Greater {
            other
        } else {
            self
        }
    }

    /// The larger of the two values; NaN wins over any other value.
    pub fn max(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        if ops::compare(self.0, other.0) == Ordering::Less {
            other
        } else {
            self
        }
    }

    pub fn add_with_rounding(self, rhs: Self, rounding: Rounding) -> Self {
        Decimal64(ops::add(self.0, rhs.0, rounding))
    }

    pub fn sub_with_rounding(self, rhs: Self, rounding: Rounding) -> Self {
        Decimal64(ops::subtract(self.0, rhs.0, rounding))
    }

    pub fn mul_with_rounding(self, rhs: Self, rounding: Rounding) -> Self {
        Decimal64(ops::multiply(self.0, rhs.0, rounding))
    }

    pub fn div_with_rounding(self, rhs: Self, rounding: Rounding) -> Self {
        Decimal64(ops::divide(self.0, rhs.0, rounding))
    }

    /// Round to `n` digits after the decimal point.
    pub fn round_to(self, n: i32, round_type: RoundType) -> Self {
        Decimal64(round::round(self.0, n, round_type))
    }

    /// Round to the nearest integer, ties away from zero.
    pub fn round(self) -> Self {
        self.round_to(0, RoundType::Round)
    }

    /// Round up to an integer.
    pub fn ceil(self) -> Self {
        self.round_to(0, RoundType::Ceil)
    }

    /// Round down to an integer.
    pub fn floor(self) -> Self {
        self.round_to(0, RoundType::Floor)
    }

    /// Drop the fractional part.
    pub fn trunc(self) -> Self {
        self.round_to(0, RoundType::Trunc)
    }

    /// Round to a multiple of `multiple`, which must be a positive finite number.
    ///
    /// # Panics
    ///
    /// Panics if `multiple` is not a positive finite number.
    pub fn round_to_multiple(self, multiple: Self, round_type: RoundType) -> Self {
        let raw = match round_type {
            RoundType::Round => round::round_to_nearest_ties_away_from_zero(self.0, multiple.0),
            RoundType::Trunc => round::round_towards_zero(self.0, multiple.0),
            RoundType::Floor => round::round_towards_negative_infinity(self.0, multiple.0),
            RoundType::Ceil => round::round_towards_positive_infinity(self.0, multiple.0),
        };
        Decimal64(raw)
    }

    /// `mantissa * 10^-number_of_digits`.
    pub fn from_fixed_point(mantissa: i64, number_of_digits: i32) -> Self {
        Decimal64(convert::from_fixed_point(mantissa, number_of_digits))
    }

    /// Integral part of `self * 10^number_of_digits`, truncated towards zero;
    /// `i64::min_value()` for NaN, infinities and out-of-range values.
    pub fn to_fixed_point(self, number_of_digits: i32) -> i64 {
        convert::to_fixed_point(self.0, number_of_digits)
    }

    /// Integral part, truncated towards zero; `i64::min_value()` for NaN, infinities and
    /// out-of-range values.
    pub fn to_i64(self) -> i64 {
        convert::to_long(self.0)
    }

    /// Nearest binary64 value.
    pub fn to_f64(self) -> f64 {
        convert::to_double(self.0)
    }

    /// Decimal value nearest to `x`.
    pub fn from_f64(x: f64) -> Self {
        Decimal64(convert::from_double(x))
    }

    /// Canonical decimal value recovered from a binary64 value that originated from a
    /// decimal literal.
    pub fn from_decimal_f64(x: f64) -> Self {
        Decimal64(convert::from_decimal_double(x))
    }

    /// `self * 10^n`.
    pub fn scale_by_power_of_ten(self, n: i32) -> Self {
        Decimal64(convert::scale_by_power_of_ten(self.0, n))
    }

    /// Parse with an explicit rounding mode for literals longer than 16 digits.
    pub fn parse_rounding(s: &str, rounding: Rounding) -> Result<Self, ParseDecimalError> {
        text::parse_rounding(s, rounding).map(Decimal64)
    }

    /// Parse, falling back to `default` when the string is not a valid literal.
    pub fn try_parse(s: &str, default: Self) -> Self {
        s.parse().unwrap_or(default)
    }
}

impl Default for Decimal64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i32> for Decimal64 {
    fn from(value: i32) -> Self {
        Decimal64(convert::from_long(i64::from(value)))
    }
}

impl From<i64> for Decimal64 {
    fn from(value: i64) -> Self {
        Decimal64(convert::from_long(value))
    }
}

impl From<u32> for Decimal64 {
    fn from(value: u32) -> Self {
        Decimal64(convert::from_long(i64::from(value)))
    }
}

impl FromStr for Decimal64 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, ParseDecimalError> {
        text::parse(s).map(Decimal64)
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        text::format(self.0, f)
    }
}

impl fmt::Debug for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&text::to_debug_string(self.0))
    }
}

/// Numeric equality: all members of a cohort are equal and zeros of both signs are equal.
/// NaN is not equal to anything, itself included.
impl PartialEq for Decimal64 {
    fn eq(&self, other: &Self) -> bool {
        !self.is_nan() && !other.is_nan() && ops::compare(self.0, other.0) == Ordering::Equal
    }
}

impl PartialOrd for Decimal64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        Some(ops::compare(self.0, other.0))
    }
}

impl Neg for Decimal64 {
    type Output = Self;

    fn neg(self) -> Self {
        Decimal64(self.0 ^ SIGN_MASK)
    }
}

impl Add for Decimal64 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.add_with_rounding(rhs, Rounding::Nearest)
    }
}

impl Sub for Decimal64 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.sub_with_rounding(rhs, Rounding::Nearest)
    }
}

impl Mul for Decimal64 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.mul_with_rounding(rhs, Rounding::Nearest)
    }
}

impl Div for Decimal64 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.div_with_rounding(rhs, Rounding::Nearest)
    }
}

impl AddAssign for Decimal64 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Decimal64 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Decimal64 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Decimal64 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_decode() {
        assert_eq!(Decimal64::ZERO.to_string(), "0");
        assert_eq!(Decimal64::ONE.to_string(), "1");
        assert_eq!(Decimal64::TWO.to_string(), "2");
        assert_eq!(Decimal64::TEN.to_string(), "10");
        assert_eq!(Decimal64::HUNDRED.to_string(), "100");
        assert_eq!(Decimal64::THOUSAND.to_string(), "1000");
        assert_eq!(Decimal64::MILLION.to_string(), "1000000");
        assert_eq!(Decimal64::ONE_TENTH.to_string(), "0.1");
        assert_eq!(Decimal64::ONE_HUNDREDTH.to_string(), "0.01");
        assert_eq!(Decimal64::MAX_VALUE.to_string(), "9.999999999999999E+384");
        assert_eq!(Decimal64::MIN_POSITIVE_VALUE.to_string(), "1E-398");
    }

    #[test]
    fn constant_identities() {
        assert_eq!(Decimal64::ONE_TENTH * Decimal64::TEN, Decimal64::ONE);
        assert_eq!(Decimal64::ONE_HUNDREDTH * Decimal64::HUNDRED, Decimal64::ONE);
        assert_eq!(Decimal64::THOUSAND * Decimal64::THOUSAND, Decimal64::MILLION);
        assert_eq!(Decimal64::ONE + Decimal64::ONE, Decimal64::TWO);
    }

    #[test]
    fn classification() {
        assert!(Decimal64::NAN.is_nan());
        assert!(!Decimal64::NAN.is_snan());
        assert!(Decimal64::from_bits(consts::NAN | SIGNALING_NAN_MASK).is_snan());
        assert!(Decimal64::INFINITY.is_infinite());
        assert!(Decimal64::NEG_INFINITY.is_infinite());
        assert!(Decimal64::ONE.is_finite());
        assert!(Decimal64::ZERO.is_zero());
        assert!((-Decimal64::ZERO).is_zero());
        assert!(Decimal64::ONE.is_normal());
        assert!(Decimal64::MIN_POSITIVE_VALUE.is_subnormal());
        assert_eq!(Decimal64::ONE.classify(), FpCategory::Normal);
        assert_eq!(Decimal64::ZERO.classify(), FpCategory::Zero);
        assert_eq!(Decimal64::MAX_NEGATIVE_VALUE.classify(), FpCategory::Subnormal);
        assert_eq!(Decimal64::NAN.classify(), FpCategory::Nan);
        assert_eq!(Decimal64::INFINITY.classify(), FpCategory::Infinite);
    }

    #[test]
    fn signs() {
        assert!(Decimal64::ONE.is_positive());
        assert!(!Decimal64::ZERO.is_positive());
        assert!(Decimal64::INFINITY.is_positive());
        assert!((-Decimal64::ONE).is_negative());
        assert!((-Decimal64::ZERO).is_sign_negative());
        assert!(!(-Decimal64::ZERO).is_negative());
        assert_eq!(-(-Decimal64::ONE), Decimal64::ONE);
        assert_eq!((-Decimal64::ONE).abs(), Decimal64::ONE);
    }

    #[test]
    fn operators() {
        let a: Decimal64 = "1.5".parse().unwrap();
        let b: Decimal64 = "0.5".parse().unwrap();
        assert_eq!(a + b, Decimal64::TWO);
        assert_eq!(a - b, Decimal64::ONE);
        assert_eq!((a * b).to_string(), "0.75");
        assert_eq!((a / b).to_string(), "3");
        let mut c = a;
        c += b;
        assert_eq!(c, Decimal64::TWO);
    }

    #[test]
    fn equality_is_cohort_wide() {
        let plain: Decimal64 = "10".parse().unwrap();
        let scientific: Decimal64 = "1E+1".parse().unwrap();
        assert_ne!(plain.to_bits(), scientific.to_bits());
        assert_eq!(plain, scientific);
        assert_eq!(plain.canonize().to_bits(), scientific.to_bits());
        assert_eq!(Decimal64::ZERO, -Decimal64::ZERO);
    }

    #[test]
    fn nan_comparisons() {
        assert_ne!(Decimal64::NAN, Decimal64::NAN);
        assert_eq!(Decimal64::NAN.partial_cmp(&Decimal64::ONE), None);
        assert_eq!(
            Decimal64::NAN.compare(Decimal64::INFINITY),
            Ordering::Greater
        );
        assert_eq!(Decimal64::NAN.compare(Decimal64::NAN), Ordering::Equal);
    }

    #[test]
    fn min_max() {
        assert_eq!(Decimal64::ONE.min(Decimal64::TWO), Decimal64::ONE);
        assert_eq!(Decimal64::ONE.max(Decimal64::TWO), Decimal64::TWO);
        assert!(Decimal64::ONE.min(Decimal64::NAN).is_nan());
        assert!(Decimal64::NAN.max(Decimal64::ONE).is_nan());
    }

    #[test]
    fn parsing_and_defaults() {
        assert_eq!(Decimal64::default(), Decimal64::ZERO);
        assert_eq!(Decimal64::from(42i64).to_string(), "42");
        assert_eq!(Decimal64::from(-7i32).to_string(), "-7");
        assert_eq!(
            Decimal64::try_parse("oops", Decimal64::ZERO),
            Decimal64::ZERO
        );
        assert_eq!(
            Decimal64::try_parse("2.5", Decimal64::ZERO).to_string(),
            "2.5"
        );
    }

    #[test]
    fn rounding_methods() {
        let x: Decimal64 = "2.5".parse().unwrap();
        // The coefficient keeps the scale of the input, so the trailing zero stays
        assert_eq!(x.round().to_string(), "3.0");
        assert_eq!(x.floor().to_string(), "2.0");
        assert_eq!((-x).ceil().to_string(), "-2.0");
        assert_eq!((-x).round().to_string(), "-3.0");
        assert_eq!(x.round(), Decimal64::from(3));
        assert_eq!(x.trunc(), Decimal64::TWO);
        let price: Decimal64 = "1.234".parse().unwrap();
        let tick: Decimal64 = "0.05".parse().unwrap();
        assert_eq!(
            price.round_to_multiple(tick, RoundType::Round).to_string(),
            "1.2500"
        );
        assert_eq!(
            price.round_to_multiple(tick, RoundType::Floor).to_string(),
            "1.2000"
        );
    }

    #[test]
    fn debug_format() {
        assert_eq!(
            format!("{:?}", Decimal64::ONE),
            "0x31c0000000000001=+1E398"
        );
    }
}
