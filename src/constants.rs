//! # Protocol Constants - Wire-Format Core Constants
//!
//! ## Purpose
//!
//! Central registry of protocol-level constants used throughout the codec.
//! These values are fixed by the Protocol Buffers encoding specification and
//! must remain stable for interoperability with every other protobuf runtime.
//!
//! ## Integration Points
//!
//! - **Varint Codec**: byte-length ceilings bound the decoder's scan loops
//! - **Decoder Pool**: idle-instance cap bounds memory held by the free list
//! - **Field Keys**: field-number ceiling validates tag construction

/// Maximum number of bytes in the varint encoding of a 32-bit value
///
/// Five groups of seven bits cover 35 bits; the top three bits of the fifth
/// byte are meaningful only as the sign extension of a 64-bit encoding.
pub const MAX_VARINT32_BYTES: usize = 5;

/// Maximum number of bytes in the varint encoding of a 64-bit value
///
/// Ten groups of seven bits cover 70 bits; any continuation bit on the tenth
/// byte makes the stream malformed.
pub const MAX_VARINT64_BYTES: usize = 10;

/// Largest field number representable in a protobuf field key (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Maximum number of idle decoders retained by [`DecoderPool`](crate::DecoderPool)
///
/// Instances freed beyond this cap are dropped rather than retained.
pub const DECODER_POOL_MAX: usize = 100;
