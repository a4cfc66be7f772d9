//! # Wire-Format Decoder - Scalar Deserialization and Instance Pool
//!
//! ## Purpose
//!
//! Cursor-based reader over a borrowed byte view, deserializing the scalar
//! encodings of the Protocol Buffers wire format with comprehensive bounds
//! checking. The varint reader is the single most-invoked operation in a
//! protobuf runtime, so the 32-bit path is fully unrolled and
//! branch-predictable; a capped instance pool amortises decoder churn for
//! callers that decode many small messages.
//!
//! ## Integration Points
//!
//! - **Input**: any [`ByteSource`] (borrowed slice, owned vector, base64
//!   text), coerced once on [`Decoder::set_block`]
//! - **Output**: native Rust scalars, plus the decimal-string and
//!   [`Hash64`] carriers for precision-bridging callers
//! - **Error Handling**: every failed read returns a [`CodecError`] and
//!   latches the decoder's sticky error flag
//! - **Counterpart**: every operation here mirrors a `write_*` on
//!   [`Encoder`](crate::Encoder)
//!
//! ## Architecture Role
//!
//! ```text
//! Transport Bytes → [Decoder] → Native Scalars
//!       ↑              ↓             ↓
//!   ByteSource     Cursor Scan   Message Layer
//!   Coercion       Bounds Check  Field Dispatch
//! ```
//!
//! ## Performance Profile
//!
//! - **Varint Hot Path**: unrolled byte-at-a-time accumulation, one
//!   comparison per byte, no allocation
//! - **Fixed-Width Reads**: single bounds check + `from_le_bytes`
//! - **Error Path Cost**: detailed reporting only when a read fails
//! - **Thread Safety**: single-threaded by contract; the pool is an owned
//!   structure, never global

use std::borrow::Cow;

use tracing::debug;

use crate::byte_source::ByteSource;
use crate::constants::{DECODER_POOL_MAX, MAX_VARINT64_BYTES};
use crate::error::{CodecError, CodecResult};
use crate::split64::{self, zigzag_decode32, zigzag_decode64, Hash64};

/// Outcome of a relative decode: value plus bytes consumed, or error plus
/// bytes consumed before the fault was detected.
type Decode<T> = Result<(T, usize), (CodecError, usize)>;

#[inline(always)]
fn byte_at(s: &[u8], idx: usize) -> Result<u8, (CodecError, usize)> {
    match s.get(idx) {
        Some(&b) => Ok(b),
        None => Err((
            CodecError::PastEnd {
                need: idx + 1,
                have: s.len(),
            },
            s.len(),
        )),
    }
}

/// Unrolled varint32 decoder
///
/// Each byte contributes its low seven bits at shifts 0/7/14/21/28. The
/// fifth byte is masked with `0x0f`: its top three value bits exist only as
/// the sign extension of a 64-bit encoding and are discarded. When the
/// fifth byte still carries the continuation bit the remaining
/// sign-extension bytes are skipped (at most five); `strict` instead
/// verifies they are exactly the extension a negative 32-bit value
/// produces.
fn decode_varint32(s: &[u8], strict: bool) -> Decode<u32> {
    let b0 = byte_at(s, 0)?;
    let mut x = u32::from(b0 & 0x7f);
    if b0 < 0x80 {
        return Ok((x, 1));
    }
    let b1 = byte_at(s, 1)?;
    x |= u32::from(b1 & 0x7f) << 7;
    if b1 < 0x80 {
        return Ok((x, 2));
    }
    let b2 = byte_at(s, 2)?;
    x |= u32::from(b2 & 0x7f) << 14;
    if b2 < 0x80 {
        return Ok((x, 3));
    }
    let b3 = byte_at(s, 3)?;
    x |= u32::from(b3 & 0x7f) << 21;
    if b3 < 0x80 {
        return Ok((x, 4));
    }
    let b4 = byte_at(s, 4)?;
    x |= u32::from(b4 & 0x0f) << 28;
    if b4 < 0x80 {
        return Ok((x, 5));
    }

    // Sign extension of a negative 32-bit value encoded as 64 bits.
    if strict {
        if b4 & 0x70 != 0x70 {
            return Err((
                CodecError::InvalidEncoding("discarded varint32 bits are not a sign extension"),
                5,
            ));
        }
        for i in 5..9 {
            if byte_at(s, i)? != 0xff {
                return Err((
                    CodecError::InvalidEncoding("discarded varint32 bits are not a sign extension"),
                    i + 1,
                ));
            }
        }
        if byte_at(s, 9)? != 0x01 {
            return Err((
                CodecError::InvalidEncoding("discarded varint32 bits are not a sign extension"),
                10,
            ));
        }
        return Ok((x, 10));
    }

    for i in 5..10 {
        let b = byte_at(s, i)?;
        if b < 0x80 {
            return Ok((x, i + 1));
        }
    }
    Err((CodecError::InvalidEncoding("varint exceeds ten bytes"), 10))
}

/// Varint64 decoder: at most ten bytes, seven value bits each
///
/// Bits beyond position 63 in the tenth byte are truncated; a continuation
/// bit on the tenth byte makes the stream malformed.
fn decode_varint64(s: &[u8]) -> Decode<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT64_BYTES {
        let b = byte_at(s, i)?;
        value |= u64::from(b & 0x7f) << (7 * i);
        if b < 0x80 {
            return Ok((value, i + 1));
        }
    }
    Err((
        CodecError::InvalidEncoding("varint exceeds ten bytes"),
        MAX_VARINT64_BYTES,
    ))
}

/// Tolerant UTF-8 decoder for wire string payloads
///
/// Orphaned continuation bytes and truncated trailing sequences are skipped
/// silently; sequences that decode to no Unicode scalar value (surrogate
/// codepoints) become U+FFFD.
fn decode_utf8(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    let len = bytes.len();
    while i < len {
        let c = bytes[i];
        i += 1;
        match c {
            0x00..=0x7f => out.push(c as char),
            // Orphaned continuation byte: skip.
            0x80..=0xbf => {}
            0xc0..=0xdf => {
                if i >= len {
                    break;
                }
                let c2 = bytes[i];
                i += 1;
                let cp = (u32::from(c & 0x1f) << 6) | u32::from(c2 & 0x3f);
                out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            0xe0..=0xef => {
                if i + 1 >= len {
                    break;
                }
                let (c2, c3) = (bytes[i], bytes[i + 1]);
                i += 2;
                let cp = (u32::from(c & 0x0f) << 12)
                    | (u32::from(c2 & 0x3f) << 6)
                    | u32::from(c3 & 0x3f);
                out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            0xf0..=0xf7 => {
                if i + 2 >= len {
                    break;
                }
                let (c2, c3, c4) = (bytes[i], bytes[i + 1], bytes[i + 2]);
                i += 3;
                let cp = (u32::from(c & 0x07) << 18)
                    | (u32::from(c2 & 0x3f) << 12)
                    | (u32::from(c3 & 0x3f) << 6)
                    | u32::from(c4 & 0x3f);
                out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            // 0xf8..=0xff never leads a valid sequence: skip.
            _ => {}
        }
    }
    out
}

/// Cursor-based wire-format reader
///
/// Holds a canonical byte view plus a readable window `[start, end)` within
/// it. Reads advance the cursor; any failed read latches the sticky error
/// flag and reports a [`CodecError`]. The decoder never panics on malformed
/// input.
///
/// ```
/// use protowire::Decoder;
///
/// let mut decoder = Decoder::new(&[0xac, 0x02]).unwrap();
/// assert_eq!(decoder.read_unsigned_varint32().unwrap(), 300);
/// assert!(decoder.at_end());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Decoder<'a> {
    bytes: Option<Cow<'a, [u8]>>,
    /// Recycled backing storage for owned coercions across rebinds.
    scratch: Vec<u8>,
    start: usize,
    end: usize,
    cursor: usize,
    error: bool,
    strict: bool,
}

impl<'a> Decoder<'a> {
    /// Construct a decoder bound to `src`
    pub fn new(src: impl Into<ByteSource<'a>>) -> CodecResult<Self> {
        let mut decoder = Self::default();
        decoder.set_block(src)?;
        Ok(decoder)
    }

    /// Construct a decoder over a sub-window of `src`
    pub fn with_window(
        src: impl Into<ByteSource<'a>>,
        start: usize,
        length: usize,
    ) -> CodecResult<Self> {
        let mut decoder = Self::default();
        decoder.set_block_bounded(src, start, length)?;
        Ok(decoder)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    /// Bind the decoder to a new block, coercing the source exactly once
    ///
    /// The readable window covers the whole block and the cursor rewinds to
    /// its start; any latched error is cleared.
    pub fn set_block(&mut self, src: impl Into<ByteSource<'a>>) -> CodecResult<()> {
        let view = src.into().coerce(self.recycle())?;
        self.start = 0;
        self.cursor = 0;
        self.end = view.len();
        self.error = false;
        self.bytes = Some(view);
        Ok(())
    }

    /// Bind the decoder to the window `[start, start + length)` of a block
    ///
    /// # Errors
    ///
    /// `OutOfRange` when the window does not fit inside the block; the
    /// decoder is left unbound.
    pub fn set_block_bounded(
        &mut self,
        src: impl Into<ByteSource<'a>>,
        start: usize,
        length: usize,
    ) -> CodecResult<()> {
        let view = src.into().coerce(self.recycle())?;
        let end = start
            .checked_add(length)
            .filter(|&end| end <= view.len())
            .ok_or(CodecError::OutOfRange {
                start,
                length,
                available: view.len(),
            })?;
        self.start = start;
        self.cursor = start;
        self.end = end;
        self.error = false;
        self.bytes = Some(view);
        Ok(())
    }

    /// Unbind the block and reset all position state
    pub fn clear(&mut self) {
        self.scratch = self.recycle();
        self.start = 0;
        self.end = 0;
        self.cursor = 0;
        self.error = false;
    }

    /// Seek back to the start of the window
    pub fn reset(&mut self) {
        self.cursor = self.start;
    }

    /// Skip `count` bytes
    ///
    /// # Errors
    ///
    /// `PastEnd` when the skip leaves the window; the cursor still advances
    /// and the error flag latches.
    pub fn advance(&mut self, count: usize) -> CodecResult<()> {
        let have = self.end.saturating_sub(self.cursor);
        self.cursor = self.cursor.saturating_add(count);
        if self.cursor > self.end {
            self.error = true;
            return Err(CodecError::PastEnd { need: count, have });
        }
        Ok(())
    }

    /// True when the cursor sits exactly on the window end
    pub fn at_end(&self) -> bool {
        self.cursor == self.end
    }

    /// True when a failed read has pushed the cursor beyond the window
    pub fn past_end(&self) -> bool {
        self.cursor > self.end
    }

    /// True when corruption was detected or the cursor left the window
    pub fn get_error(&self) -> bool {
        self.error || self.cursor < self.start || self.cursor > self.end
    }

    /// The underlying byte view, if a block is bound
    pub fn get_buffer(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to an absolute offset inside the window
    pub fn set_cursor(&mut self, cursor: usize) -> CodecResult<()> {
        if cursor < self.start || cursor > self.end {
            return Err(CodecError::OutOfRange {
                start: cursor,
                length: 0,
                available: self.end,
            });
        }
        self.cursor = cursor;
        Ok(())
    }

    /// Enable verification of the varint32 sign-extension bytes the fast
    /// path otherwise discards
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    fn recycle(&mut self) -> Vec<u8> {
        match self.bytes.take() {
            Some(Cow::Owned(mut buf)) => {
                buf.clear();
                buf
            }
            _ => std::mem::take(&mut self.scratch),
        }
    }

    /// Reduce to an unbound shell, keeping recycled storage
    fn into_shell(mut self) -> Decoder<'static> {
        self.clear();
        Decoder {
            bytes: None,
            scratch: std::mem::take(&mut self.scratch),
            start: 0,
            end: 0,
            cursor: 0,
            error: false,
            strict: false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Read plumbing
    // ═══════════════════════════════════════════════════════════════════════

    /// The unread remainder of the window
    fn window(&self) -> CodecResult<&[u8]> {
        let bytes = self.bytes.as_deref().ok_or(CodecError::Unbound)?;
        let hi = self.end.min(bytes.len());
        let lo = self.cursor.min(hi);
        Ok(&bytes[lo..hi])
    }

    /// Apply a relative decode outcome: advance the cursor either way,
    /// latch the error flag on failure
    fn apply<T>(&mut self, outcome: Decode<T>) -> CodecResult<T> {
        match outcome {
            Ok((value, consumed)) => {
                self.cursor = self.cursor.saturating_add(consumed);
                Ok(value)
            }
            Err((error, consumed)) => {
                self.cursor = self.cursor.saturating_add(consumed);
                self.error = true;
                debug!("read failed at cursor {}: {}", self.cursor, error);
                Err(error)
            }
        }
    }

    fn read_fixed<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let outcome = {
            let w = self.window()?;
            if w.len() < N {
                Err((
                    CodecError::PastEnd {
                        need: N,
                        have: w.len(),
                    },
                    N,
                ))
            } else {
                let mut out = [0u8; N];
                out.copy_from_slice(&w[..N]);
                Ok((out, N))
            }
        };
        self.apply(outcome)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Fixed-width reads (little-endian)
    // ═══════════════════════════════════════════════════════════════════════

    pub fn read_uint8(&mut self) -> CodecResult<u8> {
        Ok(self.read_fixed::<1>()?[0])
    }

    pub fn read_uint16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_uint32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.read_fixed()?))
    }

    /// 8-byte little-endian fixed64
    pub fn read_uint64(&mut self) -> CodecResult<u64> {
        Ok(u64::from_le_bytes(self.read_fixed()?))
    }

    /// fixed64 through the lossless decimal-string channel
    pub fn read_uint64_string(&mut self) -> CodecResult<String> {
        Ok(self.read_uint64()?.to_string())
    }

    pub fn read_int8(&mut self) -> CodecResult<i8> {
        Ok(self.read_fixed::<1>()?[0] as i8)
    }

    pub fn read_int16(&mut self) -> CodecResult<i16> {
        Ok(i16::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_int32(&mut self) -> CodecResult<i32> {
        Ok(i32::from_le_bytes(self.read_fixed()?))
    }

    /// 8-byte little-endian two's-complement sfixed64
    pub fn read_int64(&mut self) -> CodecResult<i64> {
        Ok(i64::from_le_bytes(self.read_fixed()?))
    }

    /// sfixed64 through the lossless decimal-string channel
    pub fn read_int64_string(&mut self) -> CodecResult<String> {
        Ok(self.read_int64()?.to_string())
    }

    /// 4-byte IEEE-754 single
    pub fn read_float(&mut self) -> CodecResult<f32> {
        Ok(f32::from_le_bytes(self.read_fixed()?))
    }

    /// 8-byte IEEE-754 double
    pub fn read_double(&mut self) -> CodecResult<f64> {
        Ok(f64::from_le_bytes(self.read_fixed()?))
    }

    /// 8-byte hash64 carrier, bytes taken verbatim
    pub fn read_fixed_hash64(&mut self) -> CodecResult<Hash64> {
        self.read_fixed()
    }

    /// Read a fixed64 as little-endian halves and hand them to `convert`
    pub fn read_split_fixed64<T>(
        &mut self,
        convert: impl FnOnce(u32, u32) -> T,
    ) -> CodecResult<T> {
        let split = split64::split_uint64(self.read_uint64()?);
        Ok(convert(split.lo, split.hi))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Varint reads
    // ═══════════════════════════════════════════════════════════════════════

    /// Unrolled varint32 fast path
    ///
    /// Returns the low 32 bits of the encoded value. The sign-extension
    /// bytes of a 64-bit-encoded negative value are skipped; strict mode
    /// verifies them instead (see [`Decoder::set_strict`]).
    ///
    /// # Errors
    ///
    /// `PastEnd` on a truncated varint, `InvalidEncoding` when no
    /// terminator appears within ten bytes.
    pub fn read_unsigned_varint32(&mut self) -> CodecResult<u32> {
        let outcome = {
            let w = self.window()?;
            decode_varint32(w, self.strict)
        };
        self.apply(outcome)
    }

    /// Varint32 with the result reinterpreted as two's-complement
    pub fn read_signed_varint32(&mut self) -> CodecResult<i32> {
        Ok(self.read_unsigned_varint32()? as i32)
    }

    /// Varint64, at most ten bytes
    pub fn read_unsigned_varint64(&mut self) -> CodecResult<u64> {
        let outcome = {
            let w = self.window()?;
            decode_varint64(w)
        };
        self.apply(outcome)
    }

    /// Varint64 through the lossless decimal-string channel
    pub fn read_unsigned_varint64_string(&mut self) -> CodecResult<String> {
        Ok(self.read_unsigned_varint64()?.to_string())
    }

    /// Varint64 with the result reinterpreted as two's-complement
    pub fn read_signed_varint64(&mut self) -> CodecResult<i64> {
        Ok(self.read_unsigned_varint64()? as i64)
    }

    /// Signed varint64 through the lossless decimal-string channel
    pub fn read_signed_varint64_string(&mut self) -> CodecResult<String> {
        Ok(self.read_signed_varint64()?.to_string())
    }

    /// Read a varint64 as little-endian halves and hand them to `convert`
    pub fn read_split_varint64<T>(
        &mut self,
        convert: impl FnOnce(u32, u32) -> T,
    ) -> CodecResult<T> {
        let split = split64::split_uint64(self.read_unsigned_varint64()?);
        Ok(convert(split.lo, split.hi))
    }

    /// Zigzag varint32
    pub fn read_zigzag_varint32(&mut self) -> CodecResult<i32> {
        Ok(zigzag_decode32(self.read_unsigned_varint32()?))
    }

    /// Zigzag varint64
    pub fn read_zigzag_varint64(&mut self) -> CodecResult<i64> {
        Ok(zigzag_decode64(self.read_unsigned_varint64()?))
    }

    /// Zigzag varint64 through the lossless decimal-string channel
    pub fn read_zigzag_varint64_string(&mut self) -> CodecResult<String> {
        Ok(self.read_zigzag_varint64()?.to_string())
    }

    /// Varint64 into a hash64 carrier
    pub fn read_varint_hash64(&mut self) -> CodecResult<Hash64> {
        Ok(self.read_unsigned_varint64()?.to_le_bytes())
    }

    /// Zigzag varint64 into a hash64 carrier
    pub fn read_zigzag_varint_hash64(&mut self) -> CodecResult<Hash64> {
        Ok(self.read_zigzag_varint64()?.to_le_bytes())
    }

    /// Varint-encoded bool
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_unsigned_varint32()? != 0)
    }

    /// Enum constant as a signed varint32
    pub fn read_enum(&mut self) -> CodecResult<i32> {
        self.read_signed_varint32()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Delimited payloads (callers read the length prefix separately)
    // ═══════════════════════════════════════════════════════════════════════

    /// Copy out `length` raw bytes
    ///
    /// # Errors
    ///
    /// `PastEnd` when fewer than `length` bytes remain in the window.
    pub fn read_bytes(&mut self, length: usize) -> CodecResult<Vec<u8>> {
        let outcome = {
            let w = self.window()?;
            if w.len() < length {
                Err((
                    CodecError::PastEnd {
                        need: length,
                        have: w.len(),
                    },
                    length,
                ))
            } else {
                Ok((w[..length].to_vec(), length))
            }
        };
        self.apply(outcome)
    }

    /// Decode `length` bytes as UTF-8 text
    ///
    /// The cursor advances by exactly `length` regardless of how the bytes
    /// decode; malformed sequences degrade per [`decode_utf8`] rather than
    /// failing the read.
    pub fn read_string(&mut self, length: usize) -> CodecResult<String> {
        let outcome = {
            let w = self.window()?;
            if w.len() < length {
                Err((
                    CodecError::PastEnd {
                        need: length,
                        have: w.len(),
                    },
                    length,
                ))
            } else {
                Ok((decode_utf8(&w[..length]), length))
            }
        };
        self.apply(outcome)
    }
}

/// Bounded free list of idle decoders
///
/// Decoding many small messages through fresh decoders churns the owned
/// coercion buffers; the pool retains up to [`DECODER_POOL_MAX`] cleared
/// instances so those buffers get reused. `free` beyond the cap simply
/// drops the instance.
///
/// ```
/// use protowire::DecoderPool;
///
/// let mut pool = DecoderPool::new();
/// let mut decoder = pool.alloc(&[0x2a]).unwrap();
/// assert_eq!(decoder.read_unsigned_varint32().unwrap(), 42);
/// pool.free(decoder);
/// assert_eq!(pool.idle(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DecoderPool {
    idle: Vec<Decoder<'static>>,
}

impl DecoderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a pooled (or fresh) decoder and bind it to `src`
    pub fn alloc<'a>(&mut self, src: impl Into<ByteSource<'a>>) -> CodecResult<Decoder<'a>> {
        let mut decoder: Decoder<'a> = self.alloc_unbound();
        if let Err(error) = decoder.set_block(src) {
            self.free(decoder);
            return Err(error);
        }
        Ok(decoder)
    }

    /// Take a pooled (or fresh) decoder with no block attached
    pub fn alloc_unbound<'a>(&mut self) -> Decoder<'a> {
        self.idle.pop().unwrap_or_default()
    }

    /// Clear a decoder and return it to the pool, dropping it if the pool
    /// is already at capacity
    pub fn free(&mut self, decoder: Decoder<'_>) {
        if self.idle.len() < DECODER_POOL_MAX {
            self.idle.push(decoder.into_shell());
        }
    }

    /// Number of idle decoders currently retained
    pub fn idle(&self) -> usize {
        self.idle.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    #[test]
    fn test_varint32_fast_path() {
        let mut decoder = Decoder::new(&[0xac, 0x02]).unwrap();
        assert_eq!(decoder.read_unsigned_varint32().unwrap(), 300);
        assert!(decoder.at_end());
        assert!(!decoder.get_error());

        let mut decoder = Decoder::new(&[0x00]).unwrap();
        assert_eq!(decoder.read_unsigned_varint32().unwrap(), 0);

        let mut decoder = Decoder::new(&[0xff, 0xff, 0xff, 0xff, 0x0f]).unwrap();
        assert_eq!(decoder.read_unsigned_varint32().unwrap(), u32::MAX);
        assert!(decoder.at_end());
    }

    #[test]
    fn test_varint32_discards_sign_extension() {
        // -1 as a signed varint32: ten bytes on the wire, low 32 bits out.
        let mut encoder = Encoder::new();
        encoder.write_signed_varint32(-1);
        let bytes = encoder.end();
        assert_eq!(bytes.len(), 10);

        let mut decoder = Decoder::new(&bytes).unwrap();
        assert_eq!(decoder.read_unsigned_varint32().unwrap(), u32::MAX);
        assert_eq!(decoder.get_cursor(), 10);
        assert!(decoder.at_end());

        let mut decoder = Decoder::new(&bytes).unwrap();
        assert_eq!(decoder.read_signed_varint32().unwrap(), -1);
    }

    #[test]
    fn test_strict_mode_accepts_true_sign_extension() {
        let mut encoder = Encoder::new();
        encoder.write_signed_varint32(i32::MIN);
        let bytes = encoder.end();

        let mut decoder = Decoder::new(&bytes).unwrap();
        decoder.set_strict(true);
        assert_eq!(decoder.read_signed_varint32().unwrap(), i32::MIN);
        assert!(decoder.at_end());
    }

    #[test]
    fn test_strict_mode_rejects_garbage_extension_bits() {
        // Continuation past the fifth byte but the skipped bytes are not
        // the 0xff…0x01 pattern a sign extension produces.
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x80, 0x80, 0x80, 0x80, 0x00];

        let mut lenient = Decoder::new(&bytes[..]).unwrap();
        assert_eq!(lenient.read_unsigned_varint32().unwrap(), u32::MAX);

        let mut strict = Decoder::new(&bytes[..]).unwrap();
        strict.set_strict(true);
        assert!(matches!(
            strict.read_unsigned_varint32(),
            Err(CodecError::InvalidEncoding(_))
        ));
        assert!(strict.get_error());
    }

    #[test]
    fn test_overlong_varint_rejected_by_all_64bit_readers() {
        let mut overlong = vec![0xff; 11];
        overlong.push(0x00);

        let mut decoder = Decoder::new(&overlong).unwrap();
        assert!(matches!(
            decoder.read_unsigned_varint64(),
            Err(CodecError::InvalidEncoding(_))
        ));
        assert!(decoder.get_error());

        let mut decoder = Decoder::new(&overlong).unwrap();
        assert!(decoder.read_signed_varint64().is_err());

        let mut decoder = Decoder::new(&overlong).unwrap();
        assert!(decoder.read_zigzag_varint64().is_err());

        let mut decoder = Decoder::new(&overlong).unwrap();
        assert!(decoder.read_varint_hash64().is_err());

        let mut decoder = Decoder::new(&overlong).unwrap();
        assert!(decoder.read_unsigned_varint32().is_err());
    }

    #[test]
    fn test_truncated_varint_is_past_end() {
        let mut decoder = Decoder::new(&[0x80, 0x80]).unwrap();
        assert!(matches!(
            decoder.read_unsigned_varint32(),
            Err(CodecError::PastEnd { .. })
        ));
        assert!(decoder.get_error());
    }

    #[test]
    fn test_fixed64_needs_eight_bytes() {
        let mut decoder = Decoder::new(&[0u8, 1, 2]).unwrap();
        assert_eq!(
            decoder.read_uint64(),
            Err(CodecError::PastEnd { need: 8, have: 3 })
        );
        assert!(decoder.past_end());
        assert!(decoder.get_error());
    }

    #[test]
    fn test_errors_latch_but_reads_keep_reporting() {
        let mut decoder = Decoder::new(&[0x01]).unwrap();
        assert_eq!(decoder.read_unsigned_varint32().unwrap(), 1);
        assert!(decoder.read_uint32().is_err());
        assert!(decoder.get_error());
        // Still answering, still failing, never panicking.
        assert!(decoder.read_unsigned_varint64().is_err());
        assert!(decoder.get_error());
    }

    #[test]
    fn test_unbound_decoder_reports_unbound() {
        let mut decoder = Decoder::default();
        assert_eq!(decoder.read_uint8(), Err(CodecError::Unbound));
        // Unbound is a caller-contract violation, not stream corruption.
        assert!(!decoder.get_error());
    }

    #[test]
    fn test_window_bounds() {
        let data = [1u8, 2, 3, 4];
        let mut decoder = Decoder::with_window(&data[..], 1, 2).unwrap();
        assert_eq!(decoder.read_uint8().unwrap(), 2);
        assert_eq!(decoder.read_uint8().unwrap(), 3);
        assert!(decoder.at_end());
        assert!(decoder.read_uint8().is_err());

        assert!(matches!(
            Decoder::with_window(&data[..], 3, 2),
            Err(CodecError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_reset_and_cursor_control() {
        let data = [5u8, 6, 7];
        let mut decoder = Decoder::new(&data[..]).unwrap();
        assert_eq!(decoder.read_uint8().unwrap(), 5);
        decoder.reset();
        assert_eq!(decoder.read_uint8().unwrap(), 5);
        decoder.set_cursor(2).unwrap();
        assert_eq!(decoder.read_uint8().unwrap(), 7);
        assert!(decoder.set_cursor(4).is_err());

        decoder.reset();
        decoder.advance(2).unwrap();
        assert_eq!(decoder.get_cursor(), 2);
        assert!(decoder.advance(2).is_err());
        assert!(decoder.past_end());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut decoder = Decoder::new(&[1u8, 2]).unwrap();
        let mut twin = decoder.clone();
        assert_eq!(decoder.read_uint8().unwrap(), 1);
        assert_eq!(twin.get_cursor(), 0);
        assert_eq!(twin.read_uint8().unwrap(), 1);
    }

    #[test]
    fn test_base64_source() {
        let mut decoder = Decoder::new("AAEC").unwrap();
        assert_eq!(decoder.read_bytes(3).unwrap(), vec![0, 1, 2]);
        assert!(decoder.at_end());

        assert!(matches!(
            Decoder::new("@@@"),
            Err(CodecError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_rebinding_recycles_owned_storage() {
        let mut decoder = Decoder::new("AAEC").unwrap();
        assert_eq!(decoder.read_uint8().unwrap(), 0);
        decoder.set_block("/w==").unwrap();
        assert_eq!(decoder.read_uint8().unwrap(), 0xff);
        assert!(decoder.at_end());
    }

    #[test]
    fn test_read_string_tolerates_malformed_sequences() {
        // Orphaned continuation byte between ASCII letters.
        let mut decoder = Decoder::new(&[0x41, 0x80, 0x42]).unwrap();
        assert_eq!(decoder.read_string(3).unwrap(), "AB");

        // Surrogate codepoint arrives as U+FFFD, never as invalid UTF-8.
        let mut decoder = Decoder::new(&[0xed, 0xa0, 0x80]).unwrap();
        assert_eq!(decoder.read_string(3).unwrap(), "\u{fffd}");

        // Astral codepoints decode directly.
        let mut decoder = Decoder::new("😁".as_bytes()).unwrap();
        assert_eq!(decoder.read_string(4).unwrap(), "😁");
    }

    #[test]
    fn test_read_bytes_length_overrun() {
        let mut decoder = Decoder::new(&[1u8, 2]).unwrap();
        assert!(matches!(
            decoder.read_bytes(3),
            Err(CodecError::PastEnd { need: 3, have: 2 })
        ));
        assert!(decoder.get_error());
    }

    #[test]
    fn test_pool_caps_at_limit() {
        let mut pool = DecoderPool::new();

        let decoders: Vec<_> = (0..5).map(|_| pool.alloc_unbound()).collect();
        for decoder in decoders {
            pool.free(decoder);
        }
        assert_eq!(pool.idle(), 5);

        let decoders: Vec<_> = (0..101).map(|_| pool.alloc_unbound()).collect();
        assert_eq!(pool.idle(), 0);
        for decoder in decoders {
            pool.free(decoder);
        }
        assert_eq!(pool.idle(), DECODER_POOL_MAX);
    }

    #[test]
    fn test_pool_reuses_instances() {
        let mut pool = DecoderPool::new();
        let decoder = pool.alloc(&[0x2a]).unwrap();
        pool.free(decoder);
        assert_eq!(pool.idle(), 1);

        let mut decoder = pool.alloc("AAEC").unwrap();
        assert_eq!(pool.idle(), 0);
        assert_eq!(decoder.read_uint8().unwrap(), 0);
        pool.free(decoder);
        assert_eq!(pool.idle(), 1);
    }
}
