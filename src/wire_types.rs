//! # Field Type System - Wire-Format Type Registry
//!
//! ## Purpose
//!
//! Numeric registries for the two type vocabularies of the Protocol Buffers
//! wire format: the *field type* a schema declares for a field, and the
//! *wire type* that actually appears in the low three bits of an encoded
//! field key. Every field type maps onto exactly one wire type; the mapping
//! is a pure function used by message-layer glue when it assembles field
//! keys and by diagnostic tooling when it labels raw records.
//!
//! ## Architecture Role
//!
//! ```text
//! Schema Binding → [Field Type Registry] → Encoded Field Keys
//!       ↑                  ↓                      ↓
//!   Declared Type    field_type_to_wire_type   (tag << 3) | wire_type
//! ```
//!
//! The registry is deliberately free of message semantics: the codec core
//! never dispatches on these codes itself, it only defines them so that
//! every layer above agrees on the numbers.

use num_enum::TryFromPrimitive;

/// Declared type of a protobuf field
///
/// Codes 1-18 follow the descriptor numbering of the upstream specification.
/// Codes 30 and 31 are local extensions carrying an opaque 8-byte hash64
/// value in fixed and varint encodings respectively.
#[repr(u8)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum FieldType {
    // ═══════════════════════════════════════════════════════════════════════
    // Standard descriptor types (1-18)
    // ═══════════════════════════════════════════════════════════════════════
    Double = 1,
    Float = 2,
    Int64 = 3,
    Uint64 = 4,
    Int32 = 5,
    Fixed64 = 6,
    Fixed32 = 7,
    Bool = 8,
    String = 9,
    Group = 10,
    Message = 11,
    Bytes = 12,
    Uint32 = 13,
    Enum = 14,
    Sfixed32 = 15,
    Sfixed64 = 16,
    Sint32 = 17,
    Sint64 = 18,

    // ═══════════════════════════════════════════════════════════════════════
    // Hash64 extensions (30-31) - lossless 8-byte opaque carriers
    // ═══════════════════════════════════════════════════════════════════════
    /// 8-byte hash64 value, fixed64-encoded
    FixedHash64 = 30,
    /// 8-byte hash64 value, varint-encoded
    VarintHash64 = 31,
}

/// Encoding of a field on the wire
///
/// Appears in the low three bits of every encoded field key. Group markers
/// are legacy proto2 constructs kept only so their records can be labelled
/// and skipped.
#[repr(u8)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum WireType {
    /// Base-128 variable-length integer
    Varint = 0,
    /// 8-byte little-endian block (fixed64, sfixed64, double)
    Fixed64 = 1,
    /// Varint length prefix followed by that many payload bytes
    Delimited = 2,
    /// Group start marker (legacy)
    StartGroup = 3,
    /// Group end marker (legacy)
    EndGroup = 4,
    /// 4-byte little-endian block (fixed32, sfixed32, float)
    Fixed32 = 5,
}

/// Map a declared field type to the wire type that encodes it
pub const fn field_type_to_wire_type(field_type: FieldType) -> WireType {
    match field_type {
        FieldType::Int32
        | FieldType::Int64
        | FieldType::Uint32
        | FieldType::Uint64
        | FieldType::Sint32
        | FieldType::Sint64
        | FieldType::Bool
        | FieldType::Enum
        | FieldType::VarintHash64 => WireType::Varint,

        FieldType::Double
        | FieldType::Fixed64
        | FieldType::Sfixed64
        | FieldType::FixedHash64 => WireType::Fixed64,

        FieldType::String | FieldType::Message | FieldType::Bytes => WireType::Delimited,

        FieldType::Float | FieldType::Fixed32 | FieldType::Sfixed32 => WireType::Fixed32,

        FieldType::Group => WireType::StartGroup,
    }
}
