//! Text conversions: parsing decimal literals and rendering values back out.

use core::fmt;

use thiserror::Error;

use crate::consts::*;
use crate::unpacked::{is_infinite, is_nan, pack, pack_basic, pack_underflow, sign_mask, unpack};
use crate::Rounding;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDecimalError {
    #[error("cannot parse decimal from empty string")]
    Empty,
    #[error("invalid decimal literal")]
    Invalid,
}

/// Parse a decimal literal, rounding a too-long coefficient to nearest.
///
/// Accepts an optional sign, a plain or fractional literal with an optional `e`/`E` exponent,
/// and the case-insensitive special names `Infinity`, `Inf`, `NaN` and `SNaN`.
pub fn parse(s: &str) -> Result<u64, ParseDecimalError> {
    parse_rounding(s, Rounding::Nearest)
}

/// Same as [`parse`], with an explicit rounding mode for literals that do not fit the
/// 16-digit coefficient.
pub fn parse_rounding(s: &str, rounding: Rounding) -> Result<u64, ParseDecimalError> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(ParseDecimalError::Empty);
    }
    let at = |p: usize| -> u8 {
        if p < bytes.len() {
            bytes[p]
        } else {
            0
        }
    };

    let mut p = 0;
    let mut c = at(p);
    let mut sign = false;
    if c == b'+' {
        p += 1;
        c = at(p);
    }
    if c == b'-' {
        sign = true;
        p += 1;
        c = at(p);
    }

    if c != b'.' && !c.is_ascii_digit() {
        let rest = &s[p..];
        if rest.eq_ignore_ascii_case("Infinity") || rest.eq_ignore_ascii_case("Inf") {
            return Ok(if sign {
                NEGATIVE_INFINITY
            } else {
                POSITIVE_INFINITY
            });
        }
        if rest.eq_ignore_ascii_case("NaN") || rest.eq_ignore_ascii_case("SNaN") {
            return Ok(NAN);
        }
        return Err(ParseDecimalError::Invalid);
    }

    // Skip leading zeros, tracking how far past the radix point they reach
    let mut seen_radix_point = false;
    let mut leading_zeros_after_point: i32 = 0;
    if c == b'0' || c == b'.' {
        if c == b'.' {
            seen_radix_point = true;
            p += 1;
            c = at(p);
        }
        while c == b'0' {
            p += 1;
            c = at(p);
            if seen_radix_point {
                leading_zeros_after_point += 1;
            }
            if c == b'.' {
                if seen_radix_point {
                    return Err(ParseDecimalError::Invalid);
                }
                seen_radix_point = true;
                p += 1;
                c = at(p);
            }
            if c == 0 {
                return Ok(make_zero(sign, EXPONENT_BIAS - leading_zeros_after_point));
            }
        }
    }

    let mut number_of_digits: i32 = 0;
    let mut decimal_exponent_scale: i32 = 0;
    let mut coefficient: u64 = 0;
    let mut rounded_up = false;
    let mut rounded = false;
    let mut midpoint = false;
    let mut carried = false;
    let mut additional_exponent: i32 = 0;

    while c.is_ascii_digit() || c == b'.' {
        if c == b'.' {
            if seen_radix_point {
                return Err(ParseDecimalError::Invalid);
            }
            seen_radix_point = true;
            p += 1;
            c = at(p);
            continue;
        }

        if seen_radix_point {
            decimal_exponent_scale += 1;
        }

        number_of_digits += 1;
        if number_of_digits <= COEFFICIENT_SIZE as i32 {
            coefficient = coefficient * 10 + u64::from(c - b'0');
        } else if number_of_digits == COEFFICIENT_SIZE as i32 + 1 {
            // The 17th digit decides the rounding of the kept 16
            match rounding {
                Rounding::Nearest => {
                    midpoint = c == b'5' && coefficient & 1 == 0;
                    if c > b'5' || (c == b'5' && coefficient & 1 != 0) {
                        coefficient += 1;
                        rounded_up = true;
                    }
                }
                Rounding::Down => {
                    if sign {
                        coefficient += 1;
                        rounded_up = true;
                    }
                }
                Rounding::Up => {
                    if !sign {
                        coefficient += 1;
                        rounded_up = true;
                    }
                }
                Rounding::Zero => {}
                Rounding::TiesAway => {
                    if c >= b'5' {
                        coefficient += 1;
                        rounded_up = true;
                    }
                }
            }
            if coefficient == MAXIMUM_COEFFICIENT {
                coefficient = 1_000_000_000_000_000;
                carried = true;
                additional_exponent = 1;
            }
            if c > b'0' {
                rounded = true;
            }
            additional_exponent += 1;
        } else {
            additional_exponent += 1;
            if c > b'0' {
                // A non-zero tail turns an exact midpoint into an ordinary round-up
                if midpoint {
                    coefficient += 1;
                    midpoint = false;
                    rounded_up = true;
                }
                rounded = true;
            }
        }

        p += 1;
        c = at(p);
    }

    additional_exponent -= decimal_exponent_scale + leading_zeros_after_point;

    let mut exponent: i32 = 0;
    if c != 0 {
        if c != b'E' && c != b'e' {
            return Err(ParseDecimalError::Invalid);
        }
        p += 1;
        c = at(p);

        let exponent_signed = c == b'-';
        if c == b'-' || c == b'+' {
            p += 1;
            c = at(p);
        }
        if !c.is_ascii_digit() {
            return Err(ParseDecimalError::Invalid);
        }
        while c.is_ascii_digit() {
            // Cap the accumulated exponent; the magnitude is already far out of range
            if exponent < (1 << 20) {
                exponent = exponent * 10 + i32::from(c - b'0');
            }
            p += 1;
            c = at(p);
        }
        if c != 0 {
            return Err(ParseDecimalError::Invalid);
        }
        if exponent_signed {
            exponent = -exponent;
        }
    }

    let exponent = exponent + additional_exponent + EXPONENT_BIAS;
    if exponent < 0 {
        // Undo the 17th-digit rounding; the underflow path re-rounds with a sticky digit
        let mut exponent = exponent;
        if rounded_up {
            if carried {
                coefficient = MAX_COEFFICIENT;
                exponent -= 1;
            } else {
                coefficient -= 1;
            }
        }
        return Ok(pack_underflow(sign, exponent, coefficient, rounded, rounding));
    }
    Ok(pack(sign_mask(sign), exponent, coefficient, rounding))
}

fn make_zero(sign: bool, exponent: i32) -> u64 {
    pack_basic(
        sign_mask(sign),
        exponent.max(0).min(BIASED_EXPONENT_MAX),
        0,
    )
}

/// Render a value. Finite values use the scientific notation window: exponential form when
/// the exponent is positive or the adjusted exponent drops below -6, plain form otherwise.
/// Trailing coefficient zeros are kept, so formatting then parsing restores the exact bits
/// of any finite value.
pub fn format<W: fmt::Write>(value: u64, out: &mut W) -> fmt::Result {
    if is_nan(value) {
        return out.write_str("NaN");
    }
    if is_infinite(value) {
        return out.write_str(if value & SIGN_MASK != 0 {
            "-Infinity"
        } else {
            "Infinity"
        });
    }

    let parts = unpack(value);
    if parts.sign {
        out.write_char('-')?;
    }
    let digits = parts.coefficient.to_string();
    let exponent = parts.exponent - EXPONENT_BIAS;
    let pre = digits.len() as i32 + exponent;

    if exponent > 0 || pre < -5 {
        // Exponential form with the point after the first digit
        let adjusted = pre - 1;
        out.write_str(&digits[..1])?;
        if digits.len() > 1 {
            out.write_char('.')?;
            out.write_str(&digits[1..])?;
        }
        return if adjusted < 0 {
            write!(out, "E-{}", -adjusted)
        } else {
            write!(out, "E+{}", adjusted)
        };
    }
    if pre > 0 {
        let pre = pre as usize;
        if pre < digits.len() {
            out.write_str(&digits[..pre])?;
            out.write_char('.')?;
            out.write_str(&digits[pre..])
        } else {
            out.write_str(&digits)
        }
    } else {
        out.write_str("0.")?;
        for _ in 0..-pre {
            out.write_char('0')?;
        }
        out.write_str(&digits)
    }
}

pub fn to_string(value: u64) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = format(value, &mut out);
    out
}

/// Raw bits plus the decoded triple, for diagnostics: `0x2ff..e9=+1E397`.
pub fn to_debug_string(value: u64) -> String {
    let mut out = format!("0x{:x}=", value);
    out.push(if value & SIGN_MASK != 0 { '-' } else { '+' });
    if is_nan(value) {
        out.push_str("NaN");
    } else if is_infinite(value) {
        out.push_str("Infinity");
    } else {
        let parts = unpack(value);
        out.push_str(&parts.coefficient.to_string());
        out.push('E');
        out.push_str(&parts.exponent.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(coefficient: i64, exponent: i32) -> u64 {
        pack_basic(
            sign_mask(coefficient < 0),
            exponent + EXPONENT_BIAS,
            coefficient.unsigned_abs(),
        )
    }

    #[test]
    fn parse_plain() {
        assert_eq!(parse("0"), Ok(ZERO));
        assert_eq!(parse("-0"), Ok(SIGN_MASK | ZERO));
        assert_eq!(parse("1"), Ok(dec(1, 0)));
        assert_eq!(parse("10"), Ok(dec(10, 0)));
        assert_eq!(parse("-42"), Ok(dec(-42, 0)));
        assert_eq!(parse("123.456789123"), Ok(dec(123_456_789_123, -9)));
        assert_eq!(parse("0.05"), Ok(dec(5, -2)));
        assert_eq!(parse("0.00"), Ok(dec(0, -2)));
        assert_eq!(parse(".5"), Ok(dec(5, -1)));
        assert_eq!(parse("+1.23"), Ok(dec(123, -2)));
    }

    #[test]
    fn parse_exponent() {
        assert_eq!(parse("1E+1"), Ok(dec(1, 1)));
        assert_eq!(parse("1e1"), Ok(dec(1, 1)));
        assert_eq!(parse("4.2E-7"), Ok(dec(42, -8)));
        assert_eq!(parse("-1.5e-300"), Ok(dec(-15, -301)));
        assert_eq!(parse("0E+2"), Ok(dec(0, 2)));
    }

    #[test]
    fn parse_specials() {
        assert_eq!(parse("Infinity"), Ok(POSITIVE_INFINITY));
        assert_eq!(parse("-inf"), Ok(NEGATIVE_INFINITY));
        assert_eq!(parse("NaN"), Ok(NAN));
        assert_eq!(parse("-nan"), Ok(NAN));
        // Signaling NaN payloads quiet down on input
        assert_eq!(parse("SNaN"), Ok(NAN));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse(""), Err(ParseDecimalError::Empty));
        assert_eq!(parse("abc"), Err(ParseDecimalError::Invalid));
        assert_eq!(parse("1.2.3"), Err(ParseDecimalError::Invalid));
        assert_eq!(parse("1e"), Err(ParseDecimalError::Invalid));
        assert_eq!(parse("1e+"), Err(ParseDecimalError::Invalid));
        assert_eq!(parse("1x5"), Err(ParseDecimalError::Invalid));
        assert_eq!(parse("+"), Err(ParseDecimalError::Invalid));
    }

    #[test]
    fn parse_rounds_seventeenth_digit() {
        // Exact midpoint with an even prefix stays put
        assert_eq!(
            parse("10000000000000005"),
            Ok(dec(1_000_000_000_000_000, 1))
        );
        // Odd prefix rounds up
        assert_eq!(
            parse("10000000000000015"),
            Ok(dec(1_000_000_000_000_002, 1))
        );
        // A non-zero tail breaks the midpoint
        assert_eq!(
            parse("100000000000000050000000001"),
            Ok(dec(1_000_000_000_000_001, 11))
        );
        // ...but an all-zero tail does not
        assert_eq!(
            parse("10000000000000005000"),
            Ok(dec(1_000_000_000_000_000, 4))
        );
        assert_eq!(
            parse_rounding("19999999999999999", Rounding::Zero),
            Ok(dec(1_999_999_999_999_999, 1))
        );
    }

    #[test]
    fn parse_extremes() {
        assert_eq!(parse("1e-398"), Ok(MIN_POSITIVE_VALUE));
        assert_eq!(parse("-1e-398"), Ok(MAX_NEGATIVE_VALUE));
        assert_eq!(parse("9999999999999999E+369"), Ok(MAX_VALUE));
        assert_eq!(parse("1e999"), Ok(POSITIVE_INFINITY));
        assert_eq!(parse("-1e999999999999999999"), Ok(NEGATIVE_INFINITY));
        // Below the subnormal range everything collapses to zero
        assert_eq!(parse("1e-500"), Ok(0));
        // Halfway into the smallest subnormal, ties to even
        assert_eq!(parse("5e-399"), Ok(0));
        assert_eq!(parse("5.000000001e-399"), Ok(MIN_POSITIVE_VALUE));
    }

    #[test]
    fn format_plain_window() {
        assert_eq!(to_string(dec(10, 0)), "10");
        assert_eq!(to_string(dec(123_456_789_123, -9)), "123.456789123");
        assert_eq!(to_string(dec(123, -2)), "1.23");
        assert_eq!(to_string(dec(42, -7)), "0.0000042");
        assert_eq!(to_string(dec(-5, -1)), "-0.5");
        assert_eq!(to_string(ZERO), "0");
        assert_eq!(to_string(SIGN_MASK | ZERO), "-0");
        assert_eq!(to_string(dec(0, -2)), "0.00");
    }

    #[test]
    fn format_exponential_window() {
        assert_eq!(to_string(dec(42, -8)), "4.2E-7");
        assert_eq!(to_string(dec(1, 1)), "1E+1");
        assert_eq!(to_string(dec(1, -7)), "1E-7");
        assert_eq!(to_string(dec(1, -1)), "0.1");
        assert_eq!(to_string(dec(0, 2)), "0E+2");
        assert_eq!(to_string(MIN_POSITIVE_VALUE), "1E-398");
        assert_eq!(to_string(dec(9_999_999_999_999_999, 369)), "9.999999999999999E+384");
    }

    #[test]
    fn format_specials() {
        assert_eq!(to_string(NAN), "NaN");
        assert_eq!(to_string(NAN | SIGN_MASK), "NaN");
        assert_eq!(to_string(POSITIVE_INFINITY), "Infinity");
        assert_eq!(to_string(NEGATIVE_INFINITY), "-Infinity");
    }

    #[test]
    fn format_parse_is_bit_exact() {
        for &raw in &[
            dec(1, 0),
            dec(10, 0),
            dec(1, 1),
            dec(5, -1),
            dec(1_234_567_890_123_456, -20),
            dec(-42, -7),
            dec(0, -3),
            MIN_POSITIVE_VALUE,
            MAX_VALUE,
            MAX_NEGATIVE_VALUE,
            SIGN_MASK | ZERO,
        ] {
            assert_eq!(parse(&to_string(raw)), Ok(raw), "{}", to_debug_string(raw));
        }
    }

    #[test]
    fn debug_string_shows_triple() {
        assert_eq!(to_debug_string(dec(1, -1)), "0x31a0000000000001=+1E397");
        assert_eq!(to_debug_string(NAN), "0x7c00000000000000=+NaN");
        assert_eq!(
            to_debug_string(NEGATIVE_INFINITY),
            "0xf800000000000000=-Infinity"
        );
    }
}
