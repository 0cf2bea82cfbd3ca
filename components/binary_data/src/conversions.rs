//! Numeric conversions shared by the element codec and the array protocol.

use num_bigint::{BigInt, Sign};
use num_traits::{One, ToPrimitive};

/// Reduces a Number modulo 2^bits and returns the low `bits` as raw bits.
///
/// NaN and the infinities map to 0; finite values truncate toward zero
/// before wrapping. `bits` is at most 32.
pub(crate) fn to_integer_bits(value: f64, bits: u32) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    let modulus = (1u64 << bits) as f64;
    // fmod of two integral doubles is exact
    value.trunc().rem_euclid(modulus) as u64
}

/// Clamps a Number into [0, 255], rounding half to even.
pub(crate) fn to_uint8_clamp(value: f64) -> u8 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    if value >= 255.0 {
        return 255;
    }
    round_half_even(value) as u8
}

/// Rounds to the nearest integer, ties to even.
pub(crate) fn round_half_even(value: f64) -> f64 {
    let floor = value.floor();
    let frac = value - floor;
    if frac < 0.5 {
        floor
    } else if frac > 0.5 || floor % 2.0 != 0.0 {
        floor + 1.0
    } else {
        floor
    }
}

/// Reduces a BigInt modulo 2^64 and returns the raw bits.
pub(crate) fn bigint_to_u64_bits(value: &BigInt) -> u64 {
    let modulus = BigInt::one() << 64usize;
    let mut unsigned = value % &modulus;
    if unsigned.sign() == Sign::Minus {
        unsigned += &modulus;
    }
    unsigned.to_u64().unwrap_or_default()
}

/// Resolves a relative index against `len`.
///
/// Negative values count from the end; the result is clamped into `[0, len]`.
pub(crate) fn relative_index(index: i64, len: usize) -> usize {
    if index < 0 {
        let back = index.unsigned_abs();
        (len as u64).saturating_sub(back) as usize
    } else {
        (index as u64).min(len as u64) as usize
    }
}

/// Formats a Number the way `Number.prototype.toString()` does.
pub(crate) fn number_to_string(value: f64) -> String {
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(value).to_string()
}
