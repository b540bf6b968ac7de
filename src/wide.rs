//! "Wide" multiplication helper for the reciprocal division paths.

/// 64×128→192 multiply: `x * (hi:lo)`, returning the three 64-bit words of the product from
/// most to least significant.
pub fn mul_64x128(x: u64, hi: u64, lo: u64) -> (u64, u64, u64) {
    let low = u128::from(x) * u128::from(lo);
    let high = u128::from(x) * u128::from(hi) + (low >> 64);
    ((high >> 64) as u64, high as u64, low as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_64x128_words() {
        // (2^64 - 1) * (2^64 + 1) = 2^128 - 1
        let (hi, mid, lo) = mul_64x128(u64::max_value(), 1, 1);
        assert_eq!((hi, mid, lo), (0, u64::max_value(), u64::max_value()));

        let (hi, mid, lo) = mul_64x128(u64::max_value(), u64::max_value(), u64::max_value());
        // (2^64 - 1) * (2^128 - 1) = 2^192 - 2^128 - 2^64 + 1
        assert_eq!(hi, u64::max_value() - 1);
        assert_eq!(mid, u64::max_value());
        assert_eq!(lo, 1);
    }
}
