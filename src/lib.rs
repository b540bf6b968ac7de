//! 64-bit decimal floating point (IEEE 754-2008 decimal64) in the binary integer decimal
//! (BID) encoding, implemented in pure Rust.
//!
//! The value of a finite number is `(-1)^sign * coefficient * 10^exponent` with a 16-digit
//! decimal coefficient and an exponent between -398 and 369. Unlike binary floating point,
//! decimal fractions are represented exactly:
//!
//! ```
//! use dec64::Decimal64;
//!
//! let a: Decimal64 = "0.1".parse().unwrap();
//! let b: Decimal64 = "0.2".parse().unwrap();
//! assert_eq!((a + b).to_string(), "0.3");
//! ```
//!
//! All arithmetic rounds once, to nearest/ties-to-even by default; the `*_with_rounding`
//! methods on [`Decimal64`] give explicit control over the mode.

mod consts;
mod convert;
mod d64;
mod ops;
mod round;
mod tables;
mod text;
mod unpacked;
mod wide;

pub use crate::d64::Decimal64;
pub use crate::round::RoundType;
pub use crate::tables::div_rem_pow10;
pub use crate::text::ParseDecimalError;

/// Rounding mode applied when a result does not fit the 16-digit coefficient or the
/// exponent range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// To nearest, ties to even (the IEEE 754 default)
    Nearest,
    /// Towards negative infinity
    Down,
    /// Towards positive infinity
    Up,
    /// Towards zero
    Zero,
    /// To nearest, ties away from zero
    TiesAway,
}
