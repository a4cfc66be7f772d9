//! # 64-bit Carrier Surface - Split, Zigzag, Decimal and Hash Channels
//!
//! ## Purpose
//!
//! Conversions between the four representations a 64-bit scalar takes on at
//! the codec boundary:
//!
//! - the native `u64`/`i64` value,
//! - [`Split64`], the value as little-endian 32-bit halves,
//! - the decimal string (`^-?[0-9]+$`), a lossless textual channel for
//!   callers that cannot hold a 64-bit integer natively,
//! - [`Hash64`], an opaque 8-byte little-endian carrier with the same
//!   lossless guarantee in binary form.
//!
//! Zigzag remapping and the IEEE-754 split/join helpers for `float` and
//! `double` live here as well, next to the integer transforms they mirror.
//!
//! ## Architecture Role
//!
//! ```text
//! Encoder/Decoder ←→ [split64 conversions] ←→ Caller-Facing Channels
//!        ↓                    ↓                       ↓
//!    Wire Bytes        u64 ↔ (lo, hi)         Decimal / Hash64
//! ```
//!
//! Every function is pure and returns its result by value; the codec keeps
//! no shared scratch state between conversion steps.

use crate::error::{CodecError, CodecResult};

/// Opaque 8-byte carrier for a 64-bit value, little-endian
///
/// Preserves bit-exact 64-bit values across boundaries where a numeric type
/// would lose precision.
pub type Hash64 = [u8; 8];

/// A 64-bit value as little-endian 32-bit halves
///
/// The lingua franca between the scalar codec and callers that consume
/// 64-bit values half-at-a-time. The signed interpretation is chosen per
/// call site; sign lives in the top bit of `hi`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Split64 {
    pub lo: u32,
    pub hi: u32,
}

impl Split64 {
    pub const fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    pub const fn to_u64(self) -> u64 {
        ((self.hi as u64) << 32) | self.lo as u64
    }

    pub const fn to_i64(self) -> i64 {
        self.to_u64() as i64
    }
}

impl From<u64> for Split64 {
    fn from(value: u64) -> Self {
        split_uint64(value)
    }
}

impl From<Split64> for u64 {
    fn from(split: Split64) -> Self {
        split.to_u64()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Split: native value → (lo, hi)
// ═══════════════════════════════════════════════════════════════════════════

/// Split an unsigned 64-bit value into little-endian halves
pub const fn split_uint64(value: u64) -> Split64 {
    Split64::new(value as u32, (value >> 32) as u32)
}

/// Split a signed 64-bit value into its two's-complement halves
pub const fn split_int64(value: i64) -> Split64 {
    split_uint64(value as u64)
}

/// Split a signed 64-bit value into the halves of its zigzag encoding
pub const fn split_zigzag64(value: i64) -> Split64 {
    split_uint64(zigzag_encode64(value))
}

/// Split a 32-bit float into its IEEE-754 bit pattern; `hi` is always zero
pub fn split_float32(value: f32) -> Split64 {
    Split64::new(value.to_bits(), 0)
}

/// Split a 64-bit float into the halves of its IEEE-754 bit pattern
pub fn split_float64(value: f64) -> Split64 {
    split_uint64(value.to_bits())
}

/// Decode a hash64 carrier into little-endian halves
pub const fn split_hash64(hash: Hash64) -> Split64 {
    split_uint64(u64::from_le_bytes(hash))
}

// ═══════════════════════════════════════════════════════════════════════════
// Join: (lo, hi) → native value
// ═══════════════════════════════════════════════════════════════════════════

/// Join little-endian halves into an unsigned 64-bit value
pub const fn join_uint64(lo: u32, hi: u32) -> u64 {
    Split64::new(lo, hi).to_u64()
}

/// Join little-endian halves into a signed 64-bit value
pub const fn join_int64(lo: u32, hi: u32) -> i64 {
    join_uint64(lo, hi) as i64
}

/// Join zigzag-encoded halves into the signed value they encode
pub const fn join_zigzag64(lo: u32, hi: u32) -> i64 {
    zigzag_decode64(join_uint64(lo, hi))
}

/// Reconstruct a 32-bit float from its IEEE-754 bit pattern
pub fn join_float32(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Reconstruct a 64-bit float from the halves of its IEEE-754 bit pattern
pub fn join_float64(lo: u32, hi: u32) -> f64 {
    f64::from_bits(join_uint64(lo, hi))
}

/// Join little-endian halves into a hash64 carrier
pub const fn join_hash64(lo: u32, hi: u32) -> Hash64 {
    join_uint64(lo, hi).to_le_bytes()
}

/// Lossless decimal rendering of the unsigned value in `(lo, hi)`
pub fn join_unsigned_decimal_string(lo: u32, hi: u32) -> String {
    join_uint64(lo, hi).to_string()
}

/// Lossless decimal rendering of the signed value in `(lo, hi)`
pub fn join_signed_decimal_string(lo: u32, hi: u32) -> String {
    join_int64(lo, hi).to_string()
}

// ═══════════════════════════════════════════════════════════════════════════
// Zigzag transform
// ═══════════════════════════════════════════════════════════════════════════

/// Zigzag-encode a signed 32-bit value: `(n << 1) ^ (n >> 31)`
///
/// Maps small-magnitude values of either sign onto small unsigned values so
/// their varint encodings stay short.
pub const fn zigzag_encode32(value: i32) -> u32 {
    ((value as u32) << 1) ^ ((value >> 31) as u32)
}

/// Invert [`zigzag_encode32`]
pub const fn zigzag_decode32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Zigzag-encode a signed 64-bit value: `(n << 1) ^ (n >> 63)`
pub const fn zigzag_encode64(value: i64) -> u64 {
    ((value as u64) << 1) ^ ((value >> 63) as u64)
}

/// Invert [`zigzag_encode64`]
pub const fn zigzag_decode64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

// ═══════════════════════════════════════════════════════════════════════════
// Decimal string ↔ hash64
// ═══════════════════════════════════════════════════════════════════════════

/// Parse a decimal integer string into a hash64 carrier
///
/// Accepts `^-?[0-9]+$`. Accumulation is performed modulo 2^64, so inputs
/// beyond the 64-bit range wrap rather than fail; a leading `-` two's-
/// complement-negates the magnitude. Any other character rejects the input
/// with `None`.
pub fn decimal_string_to_hash64(dec: &str) -> Option<Hash64> {
    let (negative, digits) = match dec.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, dec),
    };
    if digits.is_empty() {
        return None;
    }

    let mut acc: u64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return None;
        }
        acc = acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0'));
    }
    if negative {
        acc = acc.wrapping_neg();
    }
    Some(acc.to_le_bytes())
}

/// Fallible form of [`decimal_string_to_hash64`] for write-path plumbing
pub(crate) fn parse_decimal_hash64(dec: &str) -> CodecResult<Hash64> {
    decimal_string_to_hash64(dec).ok_or_else(|| CodecError::ParseFailure {
        input: dec.to_owned(),
    })
}

/// Render a hash64 carrier as a decimal string
///
/// `signed` selects the two's-complement interpretation of the top bit.
pub fn hash64_to_decimal_string(hash: Hash64, signed: bool) -> String {
    if signed {
        i64::from_le_bytes(hash).to_string()
    } else {
        u64::from_le_bytes(hash).to_string()
    }
}
