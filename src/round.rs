//! Rounding to a given number of fractional digits and quantization to a multiple.

use core::cmp::Ordering;

use crate::consts::*;
use crate::ops::{compare, divide, multiply};
use crate::unpacked::{is_finite, is_nan, pack, sign_mask, unpack};
use crate::Rounding;

/// How the digits beyond the requested precision are disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundType {
    /// To nearest, ties away from zero
    Round,
    /// Towards zero
    Trunc,
    /// Towards negative infinity
    Floor,
    /// Towards positive infinity
    Ceil,
}

/// Round `value` to `n` digits after the decimal point. Non-finite values are returned
/// unchanged; the result keeps the exponent of the input (trailing zeros stay in place).
pub fn round(value: u64, n: i32, round_type: RoundType) -> u64 {
    if !is_finite(value) {
        return value;
    }
    if n > MAX_EXPONENT {
        return value;
    }
    if n < MIN_EXPONENT {
        return ZERO;
    }

    let parts = unpack(value);
    let exponent = parts.exponent - EXPONENT_BIAS + n;
    if exponent >= 0 {
        // Value is already rounded
        return value;
    }

    let abs_power = -exponent;
    // Past 16 removed digits only the sign of the discarded tail matters
    let (div_factor, add_exponent) = if abs_power >= COEFFICIENT_SIZE as i32 {
        (MAXIMUM_COEFFICIENT, abs_power - COEFFICIENT_SIZE as i32)
    } else {
        (POWERS_OF_TEN[abs_power as usize], 0)
    };

    let truncated = |coefficient: u64| coefficient / div_factor * div_factor;
    let raised = |coefficient: u64| (coefficient + div_factor - 1) / div_factor * div_factor;
    let coefficient = match round_type {
        RoundType::Round => {
            if add_exponent == 0 {
                (parts.coefficient + div_factor / 2) / div_factor * div_factor
            } else {
                0
            }
        }
        RoundType::Trunc => {
            if add_exponent == 0 {
                truncated(parts.coefficient)
            } else {
                0
            }
        }
        RoundType::Floor => {
            if !parts.sign {
                if add_exponent == 0 {
                    truncated(parts.coefficient)
                } else {
                    0
                }
            } else if add_exponent == 0 {
                raised(parts.coefficient)
            } else {
                div_factor
            }
        }
        RoundType::Ceil => {
            if parts.sign {
                if add_exponent == 0 {
                    truncated(parts.coefficient)
                } else {
                    0
                }
            } else if add_exponent == 0 {
                raised(parts.coefficient)
            } else {
                div_factor
            }
        }
    };
    if coefficient == 0 {
        return ZERO;
    }
    pack(
        sign_mask(parts.sign),
        parts.exponent + add_exponent,
        coefficient,
        Rounding::Nearest,
    )
}

fn check_multiple(multiple: u64) {
    assert!(
        is_finite(multiple) && compare(multiple, ZERO) == Ordering::Greater,
        "multiple must be a positive finite number"
    );
}

/// Nearest multiple of `multiple`, ties away from zero. `multiple` must be a positive
/// finite number. NaN passes through.
pub fn round_to_nearest_ties_away_from_zero(value: u64, multiple: u64) -> u64 {
    check_multiple(multiple);
    if is_nan(value) {
        return value;
    }
    let ratio = round(divide(value, multiple, Rounding::Nearest), 0, RoundType::Round);
    multiply(ratio, multiple, Rounding::Nearest)
}

/// Smallest multiple of `multiple` that is greater than or equal to `value`.
pub fn round_towards_positive_infinity(value: u64, multiple: u64) -> u64 {
    check_multiple(multiple);
    if is_nan(value) {
        return value;
    }
    let ratio = round(divide(value, multiple, Rounding::Nearest), 0, RoundType::Ceil);
    multiply(ratio, multiple, Rounding::Nearest)
}

/// Largest multiple of `multiple` that is less than or equal to `value`.
pub fn round_towards_negative_infinity(value: u64, multiple: u64) -> u64 {
    check_multiple(multiple);
    if is_nan(value) {
        return value;
    }
    let ratio = round(divide(value, multiple, Rounding::Nearest), 0, RoundType::Floor);
    multiply(ratio, multiple, Rounding::Nearest)
}

/// Largest multiple of `multiple` whose magnitude does not exceed that of `value`.
pub fn round_towards_zero(value: u64, multiple: u64) -> u64 {
    check_multiple(multiple);
    if is_nan(value) {
        return value;
    }
    let ratio = round(divide(value, multiple, Rounding::Nearest), 0, RoundType::Trunc);
    multiply(ratio, multiple, Rounding::Nearest)
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
    fn round_to_digits() {
        let value = dec(1234, -3); // 1.234
        assert_eq!(round(value, 2, RoundType::Round), dec(1230, -3));
        assert_eq!(round(value, 2, RoundType::Trunc), dec(1230, -3));
        assert_eq!(round(value, 1, RoundType::Round), dec(1200, -3));
        assert_eq!(round(value, 1, RoundType::Ceil), dec(1300, -3));
        assert_eq!(round(value, 3, RoundType::Round), value);
        assert_eq!(round(value, 400, RoundType::Round), value);
    }

    #[test]
    fn round_to_integer() {
        assert_eq!(round(dec(25, -1), 0, RoundType::Round), dec(30, -1));
        assert_eq!(round(dec(-25, -1), 0, RoundType::Round), dec(-30, -1));
        assert_eq!(round(dec(-15, -1), 0, RoundType::Ceil), dec(-10, -1));
        assert_eq!(round(dec(-15, -1), 0, RoundType::Floor), dec(-20, -1));
        assert_eq!(round(dec(15, -1), 0, RoundType::Trunc), dec(10, -1));
        assert_eq!(round(NAN, 0, RoundType::Round), NAN);
        assert_eq!(round(POSITIVE_INFINITY, 0, RoundType::Floor), POSITIVE_INFINITY);
    }

    #[test]
    fn round_far_below_first_digit() {
        // All digits fall away; only the direction can produce a non-zero result
        let value = dec(1234, -3);
        assert_eq!(round(value, -20, RoundType::Round), ZERO);
        assert_eq!(round(dec(-1234, -3), -20, RoundType::Ceil), ZERO);
        let up = round(value, -20, RoundType::Ceil);
        assert_eq!(compare(up, ZERO), Ordering::Greater);
    }

    #[test]
    fn round_tie_at_boundary() {
        // 9999999999999999e-1 rounded to integer carries into a 17th digit
        let value = dec(9_999_999_999_999_999, -1);
        assert_eq!(round(value, 0, RoundType::Round), dec(1_000_000_000_000_000, 0));
    }

    #[test]
    fn quantize_to_multiple() {
        let value = dec(1234, -3); // 1.234
        let tick = dec(5, -2); // 0.05
        let nearest = round_to_nearest_ties_away_from_zero(value, tick);
        assert_eq!(canonize(nearest), dec(125, -2));
        let down = round_towards_negative_infinity(value, tick);
        assert_eq!(canonize(down), dec(12, -1));
        let up = round_towards_positive_infinity(value, tick);
        assert_eq!(canonize(up), dec(125, -2));
    }

    #[test]
    fn quantize_negative_value() {
        let value = dec(-1234, -3);
        let tick = dec(5, -2);
        // Ties away from zero pulls the magnitude up
        let nearest = round_to_nearest_ties_away_from_zero(value, tick);
        assert_eq!(canonize(nearest), dec(-125, -2));
        let trunc = round_towards_zero(value, tick);
        assert_eq!(canonize(trunc), dec(-12, -1));
    }

    #[test]
    fn quantize_nan_passes_through() {
        assert_eq!(round_to_nearest_ties_away_from_zero(NAN, dec(1, 0)), NAN);
    }

    #[test]
    #[should_panic(expected = "positive finite")]
    fn quantize_rejects_negative_multiple() {
        round_to_nearest_ties_away_from_zero(dec(1, 0), dec(-1, 0));
    }
}
