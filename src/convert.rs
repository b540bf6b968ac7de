//! Conversions between decimal values and integers, fixed-point mantissas and binary
//! floating point.

use crate::consts::*;
use crate::text;
use crate::unpacked::{
    infinity, is_finite, is_infinite, is_nan, normalize_nan, pack, round_coefficient_128,
    sign_mask, unpack,
};
use crate::Rounding;

/// `value * 10^n`.
pub fn scale_by_power_of_ten(value: u64, n: i32) -> u64 {
    if is_nan(value) {
        return normalize_nan(value);
    }
    if is_infinite(value) {
        return infinity(value & SIGN_MASK != 0);
    }
    let parts = unpack(value);
    pack(
        sign_mask(parts.sign),
        parts.exponent + n,
        parts.coefficient,
        Rounding::Nearest,
    )
}

/// `mantissa * 10^-number_of_digits`. A mantissa longer than 16 digits is rounded to
/// nearest, ties to even.
pub fn from_fixed_point(mantissa: i64, number_of_digits: i32) -> u64 {
    let negative = mantissa < 0;
    let sgn = sign_mask(negative);
    let mut coefficient = mantissa.unsigned_abs();
    let mut exponent = EXPONENT_BIAS - number_of_digits;
    let digits = n_digits(coefficient);
    if digits > COEFFICIENT_SIZE {
        let extra = digits - COEFFICIENT_SIZE;
        let (rounded, adjust) = round_coefficient_128(
            u128::from(coefficient),
            extra,
            false,
            negative,
            Rounding::Nearest,
        );
        coefficient = rounded;
        exponent += adjust;
    }
    pack(sgn, exponent, coefficient, Rounding::Nearest)
}

pub fn from_long(value: i64) -> u64 {
    from_fixed_point(value, 0)
}

/// Integral part of `value * 10^number_of_digits`, truncated towards zero.
/// `i64::min_value()` stands in for NaN, infinities and out-of-range values.
pub fn to_fixed_point(value: u64, number_of_digits: i32) -> i64 {
    to_long(scale_by_power_of_ten(value, number_of_digits))
}

/// Integral part of `value`, truncated towards zero. `i64::min_value()` stands in for NaN,
/// infinities and out-of-range values.
pub fn to_long(value: u64) -> i64 {
    if !is_finite(value) {
        return i64::min_value();
    }
    let parts = unpack(value);
    if parts.coefficient == 0 {
        return 0;
    }
    let exponent = parts.exponent - EXPONENT_BIAS;
    let magnitude: u128 = if exponent >= 0 {
        if exponent > 19 {
            // Certainly beyond 64 bits
            return i64::min_value();
        }
        u128::from(parts.coefficient) * POWERS_OF_TEN_128[exponent as usize]
    } else if exponent <= -(COEFFICIENT_SIZE as i32) {
        0
    } else {
        u128::from(parts.coefficient / POWERS_OF_TEN[(-exponent) as usize])
    };
    let limit = if parts.sign {
        1u128 << 63
    } else {
        (1u128 << 63) - 1
    };
    if magnitude > limit {
        return i64::min_value();
    }
    if parts.sign {
        (magnitude as i64).wrapping_neg()
    } else {
        magnitude as i64
    }
}

const F64_POWERS_OF_TEN: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Nearest binary64 value.
pub fn to_double(value: u64) -> f64 {
    if is_nan(value) {
        return f64::NAN;
    }
    if is_infinite(value) {
        return if value & SIGN_MASK != 0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let parts = unpack(value);
    let exponent = parts.exponent - EXPONENT_BIAS;
    // Both factors exact in binary64 means a single correctly-rounded operation
    let magnitude = if parts.coefficient < (1 << 53) && exponent.abs() <= 22 {
        let coefficient = parts.coefficient as f64;
        if exponent >= 0 {
            coefficient * F64_POWERS_OF_TEN[exponent as usize]
        } else {
            coefficient / F64_POWERS_OF_TEN[(-exponent) as usize]
        }
    } else {
        // The standard library parser rounds decimal literals correctly
        text::to_string(value & !SIGN_MASK)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    };
    if parts.sign {
        -magnitude
    } else {
        magnitude
    }
}

/// Decimal value nearest to `x`, rounding the exact binary64 expansion to 16 digits.
pub fn from_double(x: f64) -> u64 {
    if x.is_nan() {
        return NAN;
    }
    if x.is_infinite() {
        return infinity(x.is_sign_negative());
    }
    if x == 0.0 {
        return sign_mask(x.is_sign_negative()) | ZERO;
    }
    // The exact decimal expansion of a binary64 value has at most 767 significant digits
    let exact = format!("{:.*e}", 770, x);
    text::parse(&exact).unwrap_or(NAN)
}

/// Shortest decimal value that converts back to `x`: undoes the decimal-to-binary noise of
/// a binary64 value that was itself produced from a decimal. Falls back to [`from_double`]
/// when no shorter neighbor survives the round trip.
pub fn from_decimal_double(x: f64) -> u64 {
    let y = from_double(x);
    if !is_finite(y) {
        return y;
    }
    let parts = unpack(y);
    let mut coefficient = parts.coefficient;
    let mut exponent = parts.exponent;
    if coefficient == 0 {
        return ZERO;
    }
    let sgn = sign_mask(parts.sign);
    if coefficient & 1 != 0 && coefficient > MAXIMUM_COEFFICIENT / 10 {
        // An odd 16-digit mantissa may sit one ulp off a shorter decimal; try the neighbor
        // with the last digit folded away
        let bumped = coefficient + 1;
        let reduced = bumped / 10;
        if bumped - reduced * 10 > 2 {
            return y;
        }
        if to_double(crate::unpacked::pack_basic(sgn, exponent + 1, reduced)) != x {
            return y;
        }
        coefficient = reduced;
        exponent += 1;
    }
    while coefficient % 10 == 0 && exponent < BIASED_EXPONENT_MAX {
        coefficient /= 10;
        exponent += 1;
    }
    crate::unpacked::pack_basic(sgn, exponent, coefficient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpacked::{canonize, pack_basic};

    fn dec(coefficient: i64, exponent: i32) -> u64 {
        pack_basic(
            sign_mask(coefficient < 0),
            exponent + EXPONENT_BIAS,
            coefficient.unsigned_abs(),
        )
    }

    #[test]
    fn long_round_trip() {
        assert_eq!(from_long(0), ZERO);
        assert_eq!(from_long(42), dec(42, 0));
        assert_eq!(from_long(-42), dec(-42, 0));
        assert_eq!(to_long(dec(42, 0)), 42);
        assert_eq!(to_long(dec(-42, 0)), -42);
    }

    #[test]
    fn from_long_rounds_nineteen_digits() {
        // i64::MAX = 9223372036854775807 keeps 16 digits
        assert_eq!(from_long(i64::max_value()), dec(9_223_372_036_854_776, 3));
        assert_eq!(from_long(i64::min_value()), dec(-9_223_372_036_854_776, 3));
    }

    #[test]
    fn to_long_truncates() {
        assert_eq!(to_long(dec(1999, -2)), 19);
        assert_eq!(to_long(dec(-1999, -2)), -19);
        assert_eq!(to_long(dec(5, -1)), 0);
        assert_eq!(to_long(dec(123, 2)), 12300);
    }

    #[test]
    fn to_long_sentinel() {
        assert_eq!(to_long(NAN), i64::min_value());
        assert_eq!(to_long(POSITIVE_INFINITY), i64::min_value());
        assert_eq!(to_long(dec(1, 100)), i64::min_value());
        // One step past i64::MIN lands on the sentinel anyway
        assert_eq!(to_long(dec(-9_223_372_036_854_776, 3)), i64::min_value());
    }

    #[test]
    fn fixed_point_round_trip() {
        assert_eq!(from_fixed_point(12345, 3), dec(12345, -3));
        assert_eq!(from_fixed_point(-12345, 3), dec(-12345, -3));
        assert_eq!(to_fixed_point(dec(12345, -3), 3), 12345);
        assert_eq!(to_fixed_point(dec(12345, -3), 2), 1234);
        assert_eq!(from_fixed_point(1, 398), MIN_POSITIVE_VALUE);
        assert_eq!(from_fixed_point(-1, 398), MAX_NEGATIVE_VALUE);
    }

    #[test]
    fn scale_shifts_exponent() {
        assert_eq!(scale_by_power_of_ten(dec(5, 0), 2), dec(5, 2));
        // 5e-400 is 0.05 ulp of the subnormal range
        assert_eq!(scale_by_power_of_ten(dec(5, 0), -400), 0);
        assert_eq!(scale_by_power_of_ten(POSITIVE_INFINITY, 5), POSITIVE_INFINITY);
    }

    #[test]
    fn double_round_trip() {
        for &x in &[0.0, 1.0, -1.5, 0.1, 123.456, 1e300, 5e-324, -2.675] {
            let y = from_double(x);
            assert_eq!(to_double(y), x, "{}", x);
        }
        assert!(to_double(from_double(f64::NAN)).is_nan());
        assert_eq!(to_double(from_double(f64::INFINITY)), f64::INFINITY);
    }

    #[test]
    fn to_double_exact_small_values() {
        assert_eq!(to_double(dec(15, -1)), 1.5);
        assert_eq!(to_double(dec(-25, -2)), -0.25);
        assert_eq!(to_double(ZERO), 0.0);
        assert!(to_double(SIGN_MASK | ZERO).is_sign_negative());
        // Deep subnormal decimal range is below anything binary64 can hold
        assert_eq!(to_double(MIN_POSITIVE_VALUE), 0.0);
    }

    #[test]
    fn decimal_double_is_canonical() {
        for &s in &["0.1", "1.5", "-1.11", "123.456", "0.049", "2.675", "1000000"] {
            let x = to_double(crate::text::parse(s).expect(s));
            let y = from_decimal_double(x);
            assert_eq!(to_double(y), x, "{}", s);
            assert_eq!(canonize(y), y, "{}", s);
            assert_eq!(y, canonize(crate::text::parse(s).expect(s)), "{}", s);
        }
    }
}
