//! Arithmetic on raw 64-bit values: addition, subtraction, multiplication, division and
//! ordering.

use core::cmp::Ordering;

use crate::consts::*;
use crate::unpacked::{
    infinity, is_infinite, is_nan, normalize_nan, pack, pack_basic, round_coefficient_128,
    sign_mask, unpack, Unpacked,
};
use crate::Rounding;

/// Take the zero with the smallest exponent (most "precise" zero). Take the sign depending
/// on rounding.
fn min_zero(lhs: Unpacked, rhs: Unpacked, rounding: Rounding) -> Unpacked {
    let sign = if lhs.sign != rhs.sign {
        rounding == Rounding::Down
    } else {
        lhs.sign
    };
    Unpacked {
        exponent: lhs.exponent.min(rhs.exponent),
        sign,
        ..lhs
    }
}

pub fn add(lhs: u64, rhs: u64, rounding: Rounding) -> u64 {
    let lhs_is_nan = is_nan(lhs);
    let rhs_is_nan = is_nan(rhs);
    let lhs_is_infinite = is_infinite(lhs);
    let rhs_is_infinite = is_infinite(rhs);
    let lhs_sign = (lhs & SIGN_MASK) != 0;
    let rhs_sign = (rhs & SIGN_MASK) != 0;
    if lhs_is_nan {
        return normalize_nan(lhs);
    } else if rhs_is_nan {
        return normalize_nan(rhs);
    } else if lhs_is_infinite && rhs_is_infinite && lhs_sign != rhs_sign {
        // Opposite signed infinity
        return NAN_MASK;
    } else if lhs_is_infinite {
        return infinity(lhs_sign);
    } else if rhs_is_infinite {
        return infinity(rhs_sign);
    }

    // Now we can unpack numbers as they are not NaN or Infinite
    let mut lhs_unpacked = unpack(lhs);
    let mut rhs_unpacked = unpack(rhs);

    // Handle zeroes
    if lhs_unpacked.coefficient == 0 && rhs_unpacked.coefficient == 0 {
        let zero = min_zero(lhs_unpacked, rhs_unpacked, rounding);
        return pack_basic(sign_mask(zero.sign), zero.exponent, 0);
    } else if lhs_unpacked.coefficient == 0 {
        if lhs_unpacked.exponent >= rhs_unpacked.exponent {
            return rhs;
        }
        // Need to rescale rhs to lhs exponent (or as much as we can without losing digits)
        rhs_unpacked.increase_precision(lhs_unpacked.exponent);
        return pack_basic(
            sign_mask(rhs_unpacked.sign),
            rhs_unpacked.exponent,
            rhs_unpacked.coefficient,
        );
    } else if rhs_unpacked.coefficient == 0 {
        if rhs_unpacked.exponent >= lhs_unpacked.exponent {
            return lhs;
        }
        lhs_unpacked.increase_precision(rhs_unpacked.exponent);
        return pack_basic(
            sign_mask(lhs_unpacked.sign),
            lhs_unpacked.exponent,
            lhs_unpacked.coefficient,
        );
    }

    // Done with handling zeros

    // make `a` to be the number with bigger exponent
    let (mut a, mut b) = if lhs_unpacked.exponent < rhs_unpacked.exponent {
        (rhs_unpacked, lhs_unpacked)
    } else {
        (lhs_unpacked, rhs_unpacked)
    };

    a.increase_precision(b.exponent);

    let mut diff_exp = a.exponent - b.exponent;

    // We can accommodate up to 2 more digits in our coefficient storage without overflow
    // (temporarily, we won't be able to represent it as a decimal in the end, but we will do
    // rounding). Increase precision of `a` by up to two digits, to trigger rounding in the
    // end. Two digits are necessary so we don't get case where we take `1_000_000_000_000_000`,
    // add one more digit to get `10_000_000_000_000_000`, then subtract "epsilon" (very small)
    // `b` and get `9_999_999_999_999_999` which would skip rounding (as it fits as-is into 16
    // allowed decimal digits).
    match diff_exp {
        0 => {}
        1 => {
            a.coefficient *= 10;
            a.exponent -= 1;
            diff_exp -= 1;
        }
        _ => {
            a.coefficient *= 100;
            a.exponent -= 2;
            diff_exp -= 2;
        }
    }

    // Scale down `b`. Check for necessity of removing a tie break. We know that last two
    // digits of `a` are zeros (because we would only need to scale `b` if scale difference is
    // too big, in which case we add two more digits to `a`). If last digit of `b` is `0` or
    // `5`, this will create a "tie" during certain rounding modes (`Nearest`, `TiesAway`)
    // which would depend on digits in `b` we rounded off here. Check that condition and
    // remove tie by adding a small "epsilon" of `1` to `b`.
    if diff_exp > COEFFICIENT_SIZE as i32 {
        // We know `b` wasn't zero, so this is a "tie" scenario -- use small "epsilon" of `1`.
        b.coefficient = 1;
    } else if diff_exp != 0 {
        let factor = POWERS_OF_TEN[diff_exp as usize];
        let tie = b.coefficient % factor;
        b.coefficient /= factor;
        if b.coefficient % 5 == 0 && tie > 0 {
            // break the tie
            b.coefficient += 1;
        }
    }
    b.exponent += diff_exp;

    debug_assert_eq!(
        a.exponent, b.exponent,
        "Both numbers must be in the same scale"
    );

    let different_sign = lhs_unpacked.sign != rhs_unpacked.sign;
    if different_sign {
        a.coefficient = a.coefficient.wrapping_sub(b.coefficient);
    } else {
        a.coefficient = a.coefficient.wrapping_add(b.coefficient);
    }
    if a.coefficient & (1 << 63) != 0 {
        a.sign = !a.sign;
        a.coefficient = 0u64.wrapping_sub(a.coefficient);
    } else if a.coefficient == 0 {
        a.sign = rounding == Rounding::Down;
    }
    a.round_and_pack(rounding)
}

pub fn subtract(lhs: u64, rhs: u64, rounding: Rounding) -> u64 {
    if is_nan(rhs) {
        return normalize_nan(rhs);
    }
    add(lhs, rhs ^ SIGN_MASK, rounding)
}

pub fn multiply(lhs: u64, rhs: u64, rounding: Rounding) -> u64 {
    if is_nan(lhs) {
        return normalize_nan(lhs);
    }
    if is_nan(rhs) {
        return normalize_nan(rhs);
    }
    let sgn = (lhs ^ rhs) & SIGN_MASK;
    if is_infinite(lhs) {
        if !is_infinite(rhs) && unpack(rhs).coefficient == 0 {
            // Infinity times zero
            return NAN;
        }
        return sgn | INFINITY_MASK;
    }
    if is_infinite(rhs) {
        if unpack(lhs).coefficient == 0 {
            return NAN;
        }
        return sgn | INFINITY_MASK;
    }

    let x = unpack(lhs);
    let y = unpack(rhs);
    let exponent = x.exponent + y.exponent - EXPONENT_BIAS;
    if x.coefficient == 0 || y.coefficient == 0 {
        // Zero result keeps the preferred exponent, clamped into the valid range
        return pack_basic(sgn, exponent.max(0).min(BIASED_EXPONENT_MAX), 0);
    }

    let product = u128::from(x.coefficient) * u128::from(y.coefficient);
    let extra = n_digits_128(product).saturating_sub(COEFFICIENT_SIZE) as i32;
    let removed = extra.max(-exponent);
    if removed == 0 {
        return pack(sgn, exponent, product as u64, rounding);
    }
    // For a deep underflow the reciprocal step only needs to see one digit past the
    // coefficient; the quotient is zero (or one, for directed modes) either way.
    let chopped = removed.min(n_digits_128(product) as i32 + 1);
    let (coefficient, adjust) =
        round_coefficient_128(product, chopped as u32, false, sgn != 0, rounding);
    pack(
        sgn,
        exponent + (removed - chopped) + adjust,
        coefficient,
        rounding,
    )
}

pub fn divide(lhs: u64, rhs: u64, rounding: Rounding) -> u64 {
    if is_nan(lhs) {
        return normalize_nan(lhs);
    }
    if is_nan(rhs) {
        return normalize_nan(rhs);
    }
    let sgn = (lhs ^ rhs) & SIGN_MASK;
    let negative = sgn != 0;
    if is_infinite(lhs) {
        if is_infinite(rhs) {
            // Infinity over infinity
            return NAN;
        }
        return sgn | INFINITY_MASK;
    }
    if is_infinite(rhs) {
        return sgn;
    }

    let x = unpack(lhs);
    let y = unpack(rhs);
    if y.coefficient == 0 {
        if x.coefficient == 0 {
            // Zero over zero
            return NAN;
        }
        return sgn | INFINITY_MASK;
    }
    let preferred = x.exponent - y.exponent + EXPONENT_BIAS;
    if x.coefficient == 0 {
        return pack_basic(sgn, preferred.max(0).min(BIASED_EXPONENT_MAX), 0);
    }

    // Scale the dividend so the integer quotient carries 16 or 17 significant digits
    let scale = n_digits(y.coefficient) as i32 - n_digits(x.coefficient) as i32
        + COEFFICIENT_SIZE as i32;
    let numerator = u128::from(x.coefficient) * POWERS_OF_TEN_128[scale as usize];
    let denominator = u128::from(y.coefficient);
    let mut quotient = (numerator / denominator) as u64;
    let remainder = (numerator % denominator) as u64;
    let mut exponent = preferred - scale;

    if exponent < 0 {
        // Fold the underflow into the same rounding step that trims the quotient
        let removed = -exponent;
        let chopped = removed.min(n_digits(quotient) as i32 + 1);
        let (coefficient, adjust) = round_coefficient_128(
            u128::from(quotient),
            chopped as u32,
            remainder != 0,
            negative,
            rounding,
        );
        return pack(
            sgn,
            exponent + (removed - chopped) + adjust,
            coefficient,
            rounding,
        );
    }

    if remainder == 0 {
        // Exact quotient: shed trailing zeros towards the preferred exponent
        let target = preferred.min(BIASED_EXPONENT_MAX);
        while quotient % 10 == 0 && (quotient > MAX_COEFFICIENT || exponent < target) {
            quotient /= 10;
            exponent += 1;
        }
        if quotient > MAX_COEFFICIENT {
            let (coefficient, adjust) =
                round_coefficient_128(u128::from(quotient), 1, false, negative, rounding);
            return pack(sgn, exponent + adjust, coefficient, rounding);
        }
        return pack(sgn, exponent, quotient, rounding);
    }

    if quotient > MAX_COEFFICIENT {
        // 17 significant digits: drop one with the remainder as the sticky bit
        let (coefficient, adjust) =
            round_coefficient_128(u128::from(quotient), 1, true, negative, rounding);
        return pack(sgn, exponent + adjust, coefficient, rounding);
    }

    // 16 significant digits: round directly off the remainder
    let denominator = y.coefficient;
    let round_up = match rounding {
        Rounding::Nearest => {
            2 * remainder > denominator || (2 * remainder == denominator && quotient & 1 == 1)
        }
        Rounding::Down => negative,
        Rounding::Up => !negative,
        Rounding::Zero => false,
        Rounding::TiesAway => 2 * remainder >= denominator,
    };
    if round_up {
        quotient += 1;
        if quotient == MAXIMUM_COEFFICIENT {
            quotient /= 10;
            exponent += 1;
        }
    }
    pack(sgn, exponent, quotient, rounding)
}

/// Total numeric order: members of a cohort compare equal, zeros compare equal regardless of
/// sign, and NaN is greater than every other value (and equal to itself).
pub fn compare(lhs: u64, rhs: u64) -> Ordering {
    match (is_nan(lhs), is_nan(rhs)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let lhs_sign = (lhs & SIGN_MASK) != 0;
    let rhs_sign = (rhs & SIGN_MASK) != 0;
    match (is_infinite(lhs), is_infinite(rhs)) {
        (true, true) => {
            return match (lhs_sign, rhs_sign) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        }
        (true, false) => return if lhs_sign { Ordering::Less } else { Ordering::Greater },
        (false, true) => return if rhs_sign { Ordering::Greater } else { Ordering::Less },
        (false, false) => {}
    }

    let x = unpack(lhs);
    let y = unpack(rhs);
    match (x.coefficient == 0, y.coefficient == 0) {
        (true, true) => return Ordering::Equal,
        (true, false) => return if y.sign { Ordering::Greater } else { Ordering::Less },
        (false, true) => return if x.sign { Ordering::Less } else { Ordering::Greater },
        (false, false) => {}
    }
    if x.sign != y.sign {
        return if x.sign { Ordering::Less } else { Ordering::Greater };
    }
    let magnitudes = compare_magnitudes(x, y);
    if x.sign {
        magnitudes.reverse()
    } else {
        magnitudes
    }
}

fn compare_magnitudes(x: Unpacked, y: Unpacked) -> Ordering {
    let (big, small, flipped) = if x.exponent >= y.exponent {
        (x, y, false)
    } else {
        (y, x, true)
    };
    let diff = (big.exponent - small.exponent) as u32;
    // A 16-digit coefficient scaled past the other by 17 orders of magnitude always wins
    let ordering = if diff > COEFFICIENT_SIZE {
        Ordering::Greater
    } else {
        let scaled = u128::from(big.coefficient) * POWERS_OF_TEN_128[diff as usize];
        scaled.cmp(&u128::from(small.coefficient))
    };
    if flipped {
        ordering.reverse()
    } else {
        ordering
    }
}
