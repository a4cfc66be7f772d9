//! # Wire-Format Encoder - Scalar Serialization
//!
//! ## Purpose
//!
//! Append-only serializer for the Protocol Buffers wire format. The encoder
//! owns a growable byte buffer and exposes one `write_*` operation per
//! scalar encoding: little-endian fixed-width integers, IEEE-754 floats,
//! base-128 varints in unsigned, signed and zigzag flavours, raw byte
//! blocks, and UTF-8 strings. Field keys and length prefixes are ordinary
//! varints, so the message layer above assembles records from exactly these
//! operations.
//!
//! ## Integration Points
//!
//! - **Input**: native Rust scalars, plus the decimal-string and
//!   [`Hash64`] carriers for callers bridging 64-bit values across
//!   precision-losing boundaries
//! - **Output**: a `Vec<u8>` in wire-format byte order, surrendered by
//!   [`Encoder::end`]
//! - **Counterpart**: every operation here has a symmetric `read_*` on
//!   [`Decoder`](crate::Decoder)
//!
//! ## Performance Profile
//!
//! - **Hot Path**: varint emission is a single shift-and-mask loop with no
//!   allocation beyond buffer growth
//! - **Memory**: one buffer per encoder, recycled by value through `end()`
//! - **Thread Safety**: plain owned state, single-threaded by contract

use crate::error::CodecResult;
use crate::split64::{
    self, join_uint64, split_zigzag64, zigzag_encode32, zigzag_encode64, Hash64,
};

/// Append-only wire-format serializer
///
/// ```
/// use protowire::Encoder;
///
/// let mut encoder = Encoder::new();
/// encoder.write_unsigned_varint32(300);
/// assert_eq!(encoder.end(), vec![0xac, 0x02]);
/// ```
#[derive(Debug, Default)]
pub struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes accumulated so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Surrender the accumulated buffer and reset the encoder to empty
    pub fn end(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Fixed-width integers (little-endian)
    // ═══════════════════════════════════════════════════════════════════════

    pub fn write_uint8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_uint16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_uint32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// 8-byte little-endian fixed64
    pub fn write_uint64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_int8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn write_int16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_int32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// 8-byte little-endian two's-complement sfixed64
    pub fn write_int64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// sfixed64 from the lossless decimal-string channel
    ///
    /// # Errors
    ///
    /// `ParseFailure` when `value` is not a decimal integer string.
    pub fn write_int64_string(&mut self, value: &str) -> CodecResult<()> {
        let hash = split64::parse_decimal_hash64(value)?;
        self.buffer.extend_from_slice(&hash);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Varints
    // ═══════════════════════════════════════════════════════════════════════

    /// Base-128 varint, 1-5 bytes
    pub fn write_unsigned_varint32(&mut self, value: u32) {
        self.write_unsigned_varint64(u64::from(value));
    }

    /// Varint of a signed 32-bit value
    ///
    /// Negative values are sign-extended to 64 bits before encoding, so they
    /// always occupy the full ten bytes. This matches the upstream `int32`
    /// encoding rule and keeps the bytes decodable as an `int64`.
    pub fn write_signed_varint32(&mut self, value: i32) {
        self.write_unsigned_varint64(i64::from(value) as u64);
    }

    /// Base-128 varint, 1-10 bytes; the continuation bit marks all but the
    /// final byte
    pub fn write_unsigned_varint64(&mut self, mut value: u64) {
        while value > 0x7f {
            self.buffer.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Varint of a signed 64-bit value (two's-complement bits)
    pub fn write_signed_varint64(&mut self, value: i64) {
        self.write_unsigned_varint64(value as u64);
    }

    /// Varint of a 64-bit value given as little-endian halves
    pub fn write_split_varint64(&mut self, lo: u32, hi: u32) {
        self.write_unsigned_varint64(join_uint64(lo, hi));
    }

    /// Zigzag varint of a signed 32-bit value, 1-5 bytes
    pub fn write_zigzag_varint32(&mut self, value: i32) {
        self.write_unsigned_varint32(zigzag_encode32(value));
    }

    /// Zigzag varint of a signed 64-bit value, 1-10 bytes
    pub fn write_zigzag_varint64(&mut self, value: i64) {
        self.write_unsigned_varint64(zigzag_encode64(value));
    }

    /// Zigzag varint of a 64-bit value given as little-endian halves
    pub fn write_split_zigzag_varint64(&mut self, lo: u32, hi: u32) {
        let split = split_zigzag64(split64::join_int64(lo, hi));
        self.write_split_varint64(split.lo, split.hi);
    }

    /// Zigzag varint from the lossless decimal-string channel
    ///
    /// # Errors
    ///
    /// `ParseFailure` when `value` is not a decimal integer string.
    pub fn write_zigzag_varint64_string(&mut self, value: &str) -> CodecResult<()> {
        let hash = split64::parse_decimal_hash64(value)?;
        self.write_zigzag_varint_hash64(hash);
        Ok(())
    }

    /// Zigzag varint of the signed value carried in a hash64
    pub fn write_zigzag_varint_hash64(&mut self, hash: Hash64) {
        self.write_unsigned_varint64(zigzag_encode64(i64::from_le_bytes(hash)));
    }

    /// Plain varint of the value carried in a hash64
    pub fn write_varint_hash64(&mut self, hash: Hash64) {
        self.write_unsigned_varint64(u64::from_le_bytes(hash));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Fixed-width 64-bit carriers
    // ═══════════════════════════════════════════════════════════════════════

    /// 8-byte fixed64 of the value carried in a hash64; the bytes are
    /// emitted exactly as stored
    pub fn write_fixed_hash64(&mut self, hash: Hash64) {
        self.buffer.extend_from_slice(&hash);
    }

    /// 8-byte fixed64 of a value given as little-endian halves
    pub fn write_split_fixed64(&mut self, lo: u32, hi: u32) {
        self.write_uint32(lo);
        self.write_uint32(hi);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Floats, bool, enum
    // ═══════════════════════════════════════════════════════════════════════

    /// 4-byte IEEE-754 single
    pub fn write_float(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    /// 8-byte IEEE-754 double
    pub fn write_double(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    /// Single byte, `1` for true and `0` for false
    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    /// Enum constant as a signed varint32
    pub fn write_enum(&mut self, value: i32) {
        self.write_signed_varint32(value);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Delimited payloads (callers emit the length prefix separately)
    // ═══════════════════════════════════════════════════════════════════════

    /// Raw byte block, copied verbatim
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// UTF-8 string payload; returns the number of bytes written
    ///
    /// `&str` is UTF-8 by construction, so the payload is its byte content
    /// unchanged. Callers emitting a `string` field write the returned
    /// length as a varint32 prefix ahead of this payload.
    pub fn write_string(&mut self, value: &str) -> usize {
        self.buffer.extend_from_slice(value.as_bytes());
        value.len()
    }
}
