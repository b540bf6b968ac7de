//! Reciprocal tables for division by powers of ten.
//!
//! `RECIP_POW10[k]` holds `ceil(2^(128 + RECIP_SCALE[k]) / 10^k)` as a `(hi, lo)` pair of
//! 64-bit words. Multiplying a 64-bit value by the reciprocal and shifting the 192-bit
//! product right by `128 + RECIP_SCALE[k]` yields the exact quotient by `10^k` for any
//! 64-bit dividend.

use crate::consts::POWERS_OF_TEN;
use crate::wide::mul_64x128;
use crate::Rounding;

/// `(hi, lo)` words of `10^-k` scaled by `2^(128 + RECIP_SCALE[k])`, rounded up.
pub const RECIP_POW10: [(u64, u64); 36] = [
    (0, 0),                                      // 0 extra digits
    (0x3333333333333333, 0x3333333333333334),    // 1 extra digit
    (0x051eb851eb851eb8, 0x51eb851eb851eb86),    // 2 extra digits
    (0x0083126e978d4fdf, 0x3b645a1cac083127),    // 3 extra digits
    (0x00346dc5d6388659, 0x4af4f0d844d013aa),    //  10^(-4) * 2^131
    (0x0029f16b11c6d1e1, 0x08c3f3e0370cdc88),    //  10^(-5) * 2^134
    (0x00218def416bdb1a, 0x6d698fe69270b06d),    //  10^(-6) * 2^137
    (0x0035afe535795e90, 0xaf0f4ca41d811a47),    //  10^(-7) * 2^141
    (0x002af31dc4611873, 0xbf3f70834acdaea0),    //  10^(-8) * 2^144
    (0x00225c17d04dad29, 0x65cc5a02a23e254d),    //  10^(-9) * 2^147
    (0x0036f9bfb3af7b75, 0x6fad5cd10396a214),    // 10^(-10) * 2^151
    (0x002bfaffc2f2c92a, 0xbfbde3da69454e76),    // 10^(-11) * 2^154
    (0x00232f33025bd422, 0x32fe4fe1edd10b92),    // 10^(-12) * 2^157
    (0x00384b84d092ed03, 0x84ca19697c81ac1c),    // 10^(-13) * 2^161
    (0x002d09370d425736, 0x03d4e1213067bce4),    // 10^(-14) * 2^164
    (0x0024075f3dceac2b, 0x3643e74dc052fd83),    // 10^(-15) * 2^167
    (0x0039a5652fb11378, 0x56d30baf9a1e626b),    // 10^(-16) * 2^171
    (0x002e1dea8c8da92d, 0x12426fbfae7eb522),    // 10^(-17) * 2^174
    (0x0024e4bba3a48757, 0x41cebfcc8b9890e8),    // 10^(-18) * 2^177
    (0x003b07929f6da558, 0x694acc7a78f41b0d),    // 10^(-19) * 2^181
    (0x002f394219248446, 0xbaa23d2ec729af3e),    // 10^(-20) * 2^184
    (0x0025c768141d369e, 0xfbb4fdbf05baf298),    // 10^(-21) * 2^187
    (0x003c7240202ebdcb, 0x2c54c931a2c4b759),    // 10^(-22) * 2^191
    (0x00305b66802564a2, 0x89dd6dc14f03c5e1),    // 10^(-23) * 2^194
    (0x0026af8533511d4e, 0xd4b1249aa59c9e4e),    // 10^(-24) * 2^197
    (0x003de5a1ebb4fbb1, 0x544ea0f76f60fd49),    // 10^(-25) * 2^201
    (0x00318481895d9627, 0x76a54d92bf80caa1),    // 10^(-26) * 2^204
    (0x00279d346de4781f, 0x921dd7a89933d54e),    // 10^(-27) * 2^207
    (0x003f61ed7ca0c032, 0x8362f2a75b862215),    // 10^(-28) * 2^211
    (0x0032b4bdfd4d668e, 0xcf825bb91604e811),    // 10^(-29) * 2^214
    (0x00289097fdd7853f, 0x0c684960de6a5341),    // 10^(-30) * 2^217
    (0x002073accb12d0ff, 0x3d203ab3e521dc34),    // 10^(-31) * 2^220
    (0x0033ec47ab514e65, 0x2e99f7863b696053),    // 10^(-32) * 2^224
    (0x002989d2ef743eb7, 0x587b2c6b62bab376),    // 10^(-33) * 2^227
    (0x00213b0f25f69892, 0xad2f56bc4efbc2c5),    // 10^(-34) * 2^230
    (0x01a95a5b7f87a0ef, 0x0f2abc9d8c9689d1),    // 35 extra digits
];

/// Right-shift amounts beyond 128 bits paired with `RECIP_POW10`.
pub const RECIP_SCALE: [u32; 36] = [
    1, 1, 1, 1, //
    3, 6, 9, 13, 16, 19, 23, 26, 29, 33, 36, 39, 43, 46, 49, 53, 56, 59, 63, //
    66, 69, 73, 76, 79, 83, 86, 89, 92, 96, 99, 102, 109,
];

/// Pre-add constants making the reciprocal multiply round instead of truncate, indexed by
/// rounding mode row and the number of digits being removed.
pub const ROUND_CONST: [[u64; 19]; 5] = [
    // Nearest: half of the removed unit
    [
        0,
        5,
        50,
        500,
        5000,
        50000,
        500000,
        5000000,
        50000000,
        500000000,
        5000000000,
        50000000000,
        500000000000,
        5000000000000,
        50000000000000,
        500000000000000,
        5000000000000000,
        50000000000000000,
        500000000000000000,
    ],
    // Down (toward negative infinity, applied to the magnitude of a positive value)
    [0; 19],
    // Up (toward positive infinity)
    [
        0,
        9,
        99,
        999,
        9999,
        99999,
        999999,
        9999999,
        99999999,
        999999999,
        9999999999,
        99999999999,
        999999999999,
        9999999999999,
        99999999999999,
        999999999999999,
        9999999999999999,
        99999999999999999,
        999999999999999999,
    ],
    // Zero
    [0; 19],
    // Ties away from zero
    [
        0,
        5,
        50,
        500,
        5000,
        50000,
        500000,
        5000000,
        50000000,
        500000000,
        5000000000,
        50000000000,
        500000000000,
        5000000000000,
        50000000000000,
        500000000000000,
        5000000000000000,
        50000000000000000,
        500000000000000000,
    ],
];

/// Row index into `ROUND_CONST` for a rounding mode applied to a value of the given sign.
/// Directed modes flip for negative values since the tables round the magnitude.
pub fn round_const_row(rounding: Rounding, negative: bool) -> usize {
    match rounding {
        Rounding::Nearest => 0,
        Rounding::Down if negative => 2,
        Rounding::Down => 1,
        Rounding::Up if negative => 1,
        Rounding::Up => 2,
        Rounding::Zero => 3,
        Rounding::TiesAway => 4,
    }
}

/// Quotient and remainder of `value / 10^k` computed by reciprocal multiplication.
/// Bit-identical to true division for every 64-bit `value` and `k` in `0..=35`.
pub fn div_rem_pow10(value: u64, k: usize) -> (u64, u64) {
    if k == 0 {
        return (value, 0);
    }
    if k >= POWERS_OF_TEN.len() {
        // 10^k exceeds the 64-bit range, so the quotient is always zero. The scale amounts
        // past this point are also >= 64 and would overflow the shift below.
        return (0, value);
    }
    let (recip_hi, recip_lo) = RECIP_POW10[k];
    let (hi, _, _) = mul_64x128(value, recip_hi, recip_lo);
    let quotient = hi >> RECIP_SCALE[k];
    (quotient, value - quotient * POWERS_OF_TEN[k])
}
