//! Decoding and encoding between raw 64-bit words and sign/exponent/coefficient triples.

use crate::consts::*;
use crate::tables::{round_const_row, RECIP_POW10, RECIP_SCALE, ROUND_CONST};
use crate::wide::mul_64x128;
use crate::Rounding;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Unpacked {
    pub coefficient: u64,
    /// Biased exponent
    pub exponent: i32,
    /// `true` if the number is negative
    pub sign: bool,
}

pub fn sign_mask(negative: bool) -> u64 {
    if negative {
        SIGN_MASK
    } else {
        0
    }
}

pub fn infinity(negative: bool) -> u64 {
    if negative {
        NEG_INFINITY_MASK
    } else {
        INFINITY_MASK
    }
}

pub fn is_special(value: u64) -> bool {
    (value & SPECIAL_ENC_MASK) == SPECIAL_ENC_MASK
}

pub fn is_nan(value: u64) -> bool {
    (value & NAN_MASK) == NAN_MASK
}

pub fn is_infinite(value: u64) -> bool {
    (value & NAN_MASK) == INFINITY_MASK
}

pub fn is_finite(value: u64) -> bool {
    (value & INFINITY_MASK) != INFINITY_MASK
}

/// Decode a finite value. Non-canonical coefficients decode as zero.
pub fn unpack(value: u64) -> Unpacked {
    debug_assert!(
        (value & INFINITY_MASK) != INFINITY_MASK,
        "can only unpack finite values"
    );

    let sign = (value & SIGN_MASK) != 0;
    if is_special(value) {
        let coefficient = (value & SHORT_COEFF_MASK) | SHORT_COEFF_HIGH_BIT;
        Unpacked {
            coefficient: if coefficient > MAX_COEFFICIENT { 0 } else { coefficient },
            exponent: ((value >> SHORT_COEFF_SHIFT) & EXPONENT_MASK) as i32,
            sign,
        }
    } else {
        Unpacked {
            coefficient: value & LONG_COEFF_MASK,
            exponent: ((value >> LONG_COEFF_SHIFT) & EXPONENT_MASK) as i32,
            sign,
        }
    }
}

/// Encode a value whose exponent is already in range and whose coefficient does not exceed
/// 16 digits. Chooses between the small and large coefficient forms.
pub fn pack_basic(sign_mask: u64, exponent: i32, coefficient: u64) -> u64 {
    debug_assert!(sign_mask & !SIGN_MASK == 0);
    debug_assert!((0..=BIASED_EXPONENT_MAX).contains(&exponent));
    debug_assert!(coefficient <= MAX_COEFFICIENT);

    if coefficient < (1 << LONG_COEFF_SHIFT) {
        sign_mask | ((exponent as u64) << LONG_COEFF_SHIFT) | coefficient
    } else {
        sign_mask
            | SPECIAL_ENC_MASK
            | ((exponent as u64) << SHORT_COEFF_SHIFT)
            | (coefficient & SHORT_COEFF_MASK)
    }
}

/// Full encoding path: handles a 17-digit coefficient, exponent underflow (rounding digits
/// off through the reciprocal tables) and exponent overflow.
pub fn pack(sign_mask: u64, exponent: i32, coefficient: u64, rounding: Rounding) -> u64 {
    let mut exponent = exponent;
    let mut coefficient = coefficient;

    if coefficient > MAX_COEFFICIENT {
        exponent += 1;
        coefficient = 1_000_000_000_000_000;
    }

    if exponent < 0 {
        return pack_round_underflow(sign_mask, exponent, coefficient, rounding);
    }

    if exponent > BIASED_EXPONENT_MAX {
        if coefficient == 0 {
            exponent = BIASED_EXPONENT_MAX;
        }
        // Absorb the excess into trailing zeros if the coefficient has room
        while coefficient < 1_000_000_000_000_000 && exponent > BIASED_EXPONENT_MAX {
            exponent -= 1;
            coefficient *= 10;
        }
        if exponent > BIASED_EXPONENT_MAX {
            return match rounding {
                Rounding::Down if sign_mask == 0 => MAX_VALUE,
                Rounding::Up if sign_mask != 0 => MIN_VALUE,
                Rounding::Zero => sign_mask | MAX_VALUE,
                _ => sign_mask | INFINITY_MASK,
            };
        }
    }

    pack_basic(sign_mask, exponent, coefficient)
}

/// Exponent below range: round off `-exponent` digits with a single reciprocal
/// multiplication. `coefficient` must be at most 16 digits.
fn pack_round_underflow(sign_mask: u64, exponent: i32, coefficient: u64, rounding: Rounding) -> u64 {
    debug_assert!(exponent < 0);
    if exponent + (COEFFICIENT_SIZE as i32) < 0 {
        // The whole coefficient is below the representable range
        if rounding == Rounding::Down && sign_mask != 0 {
            return MAX_NEGATIVE_VALUE;
        }
        if rounding == Rounding::Up && sign_mask == 0 {
            return MIN_POSITIVE_VALUE;
        }
        return sign_mask;
    }

    let extra_digits = (-exponent) as usize;
    let row = round_const_row(rounding, sign_mask != 0);
    let biased = coefficient + ROUND_CONST[row][extra_digits];

    let (recip_hi, recip_lo) = RECIP_POW10[extra_digits];
    let (q_high, q_low_1, q_low_0) = mul_64x128(biased, recip_hi, recip_lo);
    let amount = RECIP_SCALE[extra_digits];
    let mut c64 = q_high >> amount;

    if rounding == Rounding::Nearest && (c64 & 1) != 0 {
        // Check whether the fractional part of coefficient / 10^extra_digits is exactly .5;
        // if so, the pre-added rounding constant pushed an even result up -- undo it.
        let remainder_h = q_high & (u64::max_value() >> (64 - amount));
        if remainder_h == 0 && (q_low_1, q_low_0) < (recip_hi, recip_lo) {
            c64 -= 1;
        }
    }
    sign_mask | c64
}

/// Underflow encoding for the parser: the coefficient is pre-scaled by 10 with the sticky
/// `rounded` flag folded into the unit digit, so digits beyond the 17th still influence
/// rounding.
pub fn pack_underflow(
    negative: bool,
    exponent: i32,
    coefficient: u64,
    rounded: bool,
    rounding: Rounding,
) -> u64 {
    let sgn = sign_mask(negative);
    if exponent + (COEFFICIENT_SIZE as i32) < 0 {
        if rounding == Rounding::Down && negative {
            return MAX_NEGATIVE_VALUE;
        }
        if rounding == Rounding::Up && !negative {
            return MIN_POSITIVE_VALUE;
        }
        return sgn;
    }

    let mut coefficient = coefficient * 10;
    if rounded {
        coefficient |= 1;
    }

    let extra_digits = (1 - exponent) as usize;
    let row = round_const_row(rounding, negative);
    let biased = coefficient + ROUND_CONST[row][extra_digits];

    let (recip_hi, recip_lo) = RECIP_POW10[extra_digits];
    let (q_high, q_low_1, q_low_0) = mul_64x128(biased, recip_hi, recip_lo);
    let amount = RECIP_SCALE[extra_digits];
    let mut c64 = q_high >> amount;

    if rounding == Rounding::Nearest && (c64 & 1) != 0 {
        let remainder_h = q_high & (u64::max_value() >> (64 - amount));
        if remainder_h == 0 && (q_low_1, q_low_0) < (recip_hi, recip_lo) {
            c64 -= 1;
        }
    }
    sgn | c64
}

/// Canonical member of the value's cohort: no trailing coefficient zeros. All zeros map to
/// the canonical `ZERO`, NaN to the canonical quiet NaN, infinities to their canonical
/// patterns. Idempotent.
pub fn canonize(value: u64) -> u64 {
    if (value & NAN_MASK) == NAN_MASK {
        return NAN;
    }
    if (value & INFINITY_MASK) == INFINITY_MASK {
        return infinity((value & SIGN_MASK) != 0);
    }
    canonize_finite(value)
}

fn canonize_finite(value: u64) -> u64 {
    let sgn = value & SIGN_MASK;
    let Unpacked {
        mut coefficient,
        mut exponent,
        ..
    } = unpack(value);

    if coefficient == 0 {
        return ZERO;
    }

    let mut div10 = coefficient / 10;
    if div10 * 10 != coefficient {
        return value;
    }
    loop {
        coefficient = div10;
        div10 /= 10;
        exponent += 1;
        if div10 * 10 != coefficient {
            break;
        }
    }
    pack(sgn, exponent, coefficient, Rounding::Nearest)
}

/// Normalize NaN, keeping the payload when it fits the coefficient continuation bits.
pub fn normalize_nan(value: u64) -> u64 {
    debug_assert_eq!(value & NAN_MASK, NAN_MASK, "must be NaN");

    const PAYLOAD_MASK: u64 = (1 << 50) - 1;
    let coefficient = value & PAYLOAD_MASK;
    if coefficient < MAXIMUM_COEFFICIENT / 10 {
        value & (NAN_MASK | SIGN_MASK | PAYLOAD_MASK)
    } else {
        value & (NAN_MASK | SIGN_MASK)
    }
}

impl Unpacked {
    pub fn n_digits(&self) -> u32 {
        n_digits(self.coefficient)
    }

    /// Scale the coefficient up towards the given (smaller) exponent, as far as the 16-digit
    /// limit allows.
    pub fn increase_precision(&mut self, exponent: i32) {
        let max_extra = COEFFICIENT_SIZE - self.n_digits();
        let factor = (self.exponent - exponent).min(max_extra as i32);
        self.coefficient *= POWERS_OF_TEN[factor as usize];
        self.exponent -= factor;
    }

    /// Round the last `extra` digits off the coefficient.
    pub fn apply_rounding(&mut self, extra: u32, rounding: Rounding) {
        let factor = POWERS_OF_TEN[extra as usize];
        let half_factor = factor >> 1;
        let remainder = self.coefficient % factor;
        self.coefficient /= factor;
        let round_up = match rounding {
            Rounding::Nearest if remainder == half_factor => self.coefficient & 1 == 1,
            Rounding::Nearest => remainder > half_factor,
            Rounding::Down => remainder != 0 && self.sign,
            Rounding::Up => remainder != 0 && !self.sign,
            Rounding::Zero => false,
            Rounding::TiesAway => remainder >= half_factor,
        };
        if round_up {
            self.coefficient += 1;
            // Adding one can only overflow to the limit itself; remove one more digit
            if self.coefficient == MAXIMUM_COEFFICIENT {
                self.coefficient /= 10;
                self.exponent += 1;
            }
        }
        self.exponent += extra as i32;
    }

    /// Pack a result that may carry up to 3 extra digits (from operand alignment) and may
    /// have drifted past the maximum exponent.
    pub fn round_and_pack(mut self, rounding: Rounding) -> u64 {
        let digits = self.n_digits();
        if digits > COEFFICIENT_SIZE {
            let extra = digits - COEFFICIENT_SIZE;
            self.apply_rounding(extra, rounding);
        }

        if self.exponent > BIASED_EXPONENT_MAX {
            // Value is too large
            if rounding == Rounding::Zero
                || (rounding == Rounding::Down && !self.sign)
                || (rounding == Rounding::Up && self.sign)
            {
                self.coefficient = MAX_COEFFICIENT;
                self.exponent = BIASED_EXPONENT_MAX;
            } else {
                return infinity(self.sign);
            }
        }
        pack_basic(sign_mask(self.sign), self.exponent, self.coefficient)
    }
}

/// Round a 128-bit coefficient down to at most 16 digits, removing `extra` digits in a
/// single correctly-rounded step (`sticky` carries bits already known to be lost).
pub fn round_coefficient_128(
    product: u128,
    extra: u32,
    sticky: bool,
    sign: bool,
    rounding: Rounding,
) -> (u64, i32) {
    debug_assert!(extra > 0 && (extra as usize) < POWERS_OF_TEN_128.len());
    let factor = POWERS_OF_TEN_128[extra as usize];
    let half_factor = factor >> 1;
    let remainder = product % factor;
    let mut coefficient = (product / factor) as u64;
    let round_up = match rounding {
        Rounding::Nearest if remainder == half_factor && !sticky => coefficient & 1 == 1,
        Rounding::Nearest => remainder > half_factor || (remainder == half_factor && sticky),
        Rounding::Down => (remainder != 0 || sticky) && sign,
        Rounding::Up => (remainder != 0 || sticky) && !sign,
        Rounding::Zero => false,
        Rounding::TiesAway => remainder >= half_factor,
    };
    let mut exp_adjust = extra as i32;
    if round_up {
        coefficient += 1;
        if coefficient == MAXIMUM_COEFFICIENT {
            coefficient /= 10;
            exp_adjust += 1;
        }
    }
    (coefficient, exp_adjust)
}
