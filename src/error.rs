//! Codec-level errors for wire-format encoding and decoding
//!
//! Provides error handling for the protowire codec with detailed context
//! for debugging. Each error variant includes specific information about
//! what went wrong and what was expected.

use thiserror::Error;

/// Wire-format codec errors with detailed context
///
/// Caller-contract violations (reading an unbound decoder, window arguments
/// outside the buffer) and malformed input (varints without a terminator,
/// undecodable base64) are reported through the same enum; the decoder
/// additionally latches its sticky `error` flag on any failed read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("decoder is unbound: no block was attached before reading")]
    Unbound,

    #[error("read past end of block: need {need} bytes, have {have}")]
    PastEnd { need: usize, have: usize },

    #[error("invalid wire encoding: {0}")]
    InvalidEncoding(&'static str),

    #[error("window out of range: start {start} + length {length} exceeds {available} byte buffer")]
    OutOfRange {
        start: usize,
        length: usize,
        available: usize,
    },

    #[error("not a decimal integer string: {input:?}")]
    ParseFailure { input: String },
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
