//! Bit-layout constants of the 64-bit BID decimal format.

pub const SIGN_MASK: u64 = 0b1000_0000 << 56;

/// Mask for "special encoding" (two bits after the sign bit). If the 2 bits after the sign bit
/// are `11`, then we use a "short" coefficient representation with implicit `100` prefix.
pub const SPECIAL_ENC_MASK: u64 = 0b0110_0000 << 56;
pub const INFINITY_MASK: u64 = 0b0111_1000 << 56;
pub const NEG_INFINITY_MASK: u64 = INFINITY_MASK | SIGN_MASK;
pub const NAN_MASK: u64 = 0b0111_1100 << 56;
pub const SIGNALING_NAN_MASK: u64 = 0b0000_0010 << 56;

/// Two bits in front of the exponent continuation are also part of the exponent, as long as
/// they are not `11`.
pub const EXPONENT_MASK: u64 = 0x3FF;
pub const EXPONENT_BIAS: i32 = 398;
pub const BIASED_EXPONENT_MAX: i32 = 767;
pub const MIN_EXPONENT: i32 = -383;
pub const MAX_EXPONENT: i32 = 384;

// If the most significant 4 bits of the significand are between 0 and 7, the encoded value
// begins as follows:
// s eemmm xxx   Coefficient begins with 0mmm
pub const LONG_COEFF_SHIFT: usize = 53;
pub const LONG_COEFF_MASK: u64 = (1 << LONG_COEFF_SHIFT) - 1;

// If the leading 4 bits of the significand are binary 1000 or 1001 (decimal 8 or 9), the
// number begins as follows:
// s 11eem xxx   Coefficient begins with 100m
pub const SHORT_COEFF_SHIFT: usize = 51;
pub const SHORT_COEFF_MASK: u64 = (1 << SHORT_COEFF_SHIFT) - 1;
pub const SHORT_COEFF_HIGH_BIT: u64 = 1 << LONG_COEFF_SHIFT;

/// Number of decimal digits in the coefficient.
pub const COEFFICIENT_SIZE: u32 = 16;
pub const MAX_COEFFICIENT: u64 = 9_999_999_999_999_999;
pub const MAXIMUM_COEFFICIENT: u64 = 10_000_000_000_000_000;

// Canonical encodings of the distinguished values.
pub const ZERO: u64 = 0x31C0_0000_0000_0000; // biased exponent 398, coefficient 0
pub const MAX_VALUE: u64 = 0x77FB_86F2_6FC0_FFFF;
pub const MIN_VALUE: u64 = 0xF7FB_86F2_6FC0_FFFF;
pub const MIN_POSITIVE_VALUE: u64 = 0x0000_0000_0000_0001;
pub const MAX_NEGATIVE_VALUE: u64 = 0x8000_0000_0000_0001;
pub const NAN: u64 = NAN_MASK;
pub const POSITIVE_INFINITY: u64 = INFINITY_MASK;
pub const NEGATIVE_INFINITY: u64 = NEG_INFINITY_MASK;

pub const POWERS_OF_TEN: [u64; 20] = [
    1,
    10,
    100,
    1000,
    10000,
    100000,
    1000000,
    10000000,
    100000000,
    1000000000,
    10000000000,
    100000000000,
    1000000000000,
    10000000000000,
    100000000000000,
    1000000000000000,
    10000000000000000,
    100000000000000000,
    1000000000000000000,
    10000000000000000000,
];

/// Lookup table to determine how many decimal digits we need to represent a coefficient with
/// the given amount of binary digits. A negative entry indicates that we might need `digits`
/// or `digits + 1`: if the number is less than `POWERS_OF_TEN[digits]`, then we need `digits`,
/// otherwise `digits + 1`. For example, with 4 bits we could have `0b1001` (which is `9`) or
/// `0b1010` (which is `10`), so the entry under index `[4]` is `-1`.
const DIGITS: [i8; 65] = [
    1, 1, 1, 1, -1, 2, 2, -2, 3, 3, -3, 4, 4, 4, -4, 5, 5, -5, 6, 6, -6, 7, 7, 7, -7, 8, 8, -8,
    9, 9, -9, 10, 10, 10, -10, 11, 11, -11, 12, 12, -12, 13, 13, 13, -13, 14, 14, -14, 15, 15,
    -15, 16, 16, 16, -16, 17, 17, -17, 18, 18, -18, 19, 19, 19, -19,
];

/// Number of decimal digits in `coefficient` (`1` for zero).
pub fn n_digits(coefficient: u64) -> u32 {
    let bits = 64 - coefficient.leading_zeros();
    let digits = DIGITS[bits as usize];
    if digits >= 0 {
        return digits as u32;
    }
    let digits = (-digits) as u32;
    if coefficient < POWERS_OF_TEN[digits as usize] {
        digits
    } else {
        digits + 1
    }
}

/// Number of decimal digits in a 128-bit `coefficient` (`1` for zero).
pub fn n_digits_128(coefficient: u128) -> u32 {
    if coefficient <= u64::max_value() as u128 {
        return n_digits(coefficient as u64);
    }
    // Estimate from the binary length, then correct by one digit at most.
    let bits = 128 - coefficient.leading_zeros();
    let estimate = (bits + 1) * 1233 / 4096;
    if (estimate as usize) < POWERS_OF_TEN_128.len() && coefficient >= POWERS_OF_TEN_128[estimate as usize] {
        estimate + 1
    } else {
        estimate
    }
}

pub const POWERS_OF_TEN_128: [u128; 39] = {
    let mut tab = [0u128; 39];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = 10u128.pow(i as u32);
        i += 1;
    }
    tab
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_counts() {
        assert_eq!(n_digits(0), 1);
        assert_eq!(n_digits(9), 1);
        assert_eq!(n_digits(10), 2);
        for p in 1..20 {
            assert_eq!(n_digits(POWERS_OF_TEN[p] - 1), p as u32);
            assert_eq!(n_digits(POWERS_OF_TEN[p]), p as u32 + 1);
        }
        assert_eq!(n_digits(u64::max_value()), 20);
    }

    #[test]
    fn digit_counts_128() {
        for p in 1..39 {
            assert_eq!(n_digits_128(POWERS_OF_TEN_128[p] - 1), p as u32);
            assert_eq!(n_digits_128(POWERS_OF_TEN_128[p]), p as u32 + 1);
        }
        assert_eq!(n_digits_128(u128::max_value()), 39);
    }

    #[test]
    fn distinguished_encodings() {
        assert_eq!(ZERO, (EXPONENT_BIAS as u64) << LONG_COEFF_SHIFT);
        assert_eq!(MAX_VALUE & SIGN_MASK, 0);
        assert_eq!(MIN_VALUE, MAX_VALUE | SIGN_MASK);
        assert_eq!(MAX_NEGATIVE_VALUE, MIN_POSITIVE_VALUE | SIGN_MASK);
    }
}
