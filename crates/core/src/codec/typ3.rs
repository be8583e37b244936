//! Wire-type classifier
//!
//! Maps a field type and its options to the wire representation the encoder
//! uses for it. Pure and side-effect free; callers query it for each field
//! rather than caching the answer.

use std::fmt;
use std::time::{Duration, SystemTime};

use super::type_info::FieldOptions;
use crate::error::{SchemaError, SchemaResult};
use crate::reflect::{Kind, Type};

/// Wire representation of a value
///
/// Discriminants are the proto3 wire-type numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Typ3 {
    Varint = 0,
    Fixed64 = 1,
    ByteLength = 2,
    Fixed32 = 5,
}

impl fmt::Display for Typ3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Typ3::Varint => "(U)Varint",
            Typ3::Fixed64 => "8Byte",
            Typ3::ByteLength => "ByteLength",
            Typ3::Fixed32 => "4Byte",
        };
        f.write_str(name)
    }
}

/// Classify a type under the given field options
///
/// # Errors
/// [`SchemaError::UnsupportedType`] for kinds this protocol cannot encode
/// (128-bit integers, `char`, raw pointers).
pub fn typ3_of(ty: Type, opts: &FieldOptions) -> SchemaResult<Typ3> {
    // Native time and duration travel as well-known messages
    if ty == Type::of::<SystemTime>() || ty == Type::of::<Duration>() {
        return Ok(Typ3::ByteLength);
    }

    let kind = ty.kind();
    let typ3 = match kind {
        Kind::Interface
        | Kind::Array { .. }
        | Kind::Slice(_)
        | Kind::String
        | Kind::Struct(_)
        | Kind::Map { .. } => Typ3::ByteLength,
        Kind::Int64 | Kind::Uint64 => {
            if opts.bin_fixed64 {
                Typ3::Fixed64
            } else {
                Typ3::Varint
            }
        }
        Kind::Int32 | Kind::Uint32 => {
            if opts.bin_fixed32 {
                Typ3::Fixed32
            } else {
                Typ3::Varint
            }
        }
        Kind::Int16
        | Kind::Int8
        | Kind::Int
        | Kind::Uint16
        | Kind::Uint8
        | Kind::Uint
        | Kind::Bool => Typ3::Varint,
        Kind::Float64 => Typ3::Fixed64,
        Kind::Float32 => Typ3::Fixed32,
        Kind::Int128 | Kind::Uint128 | Kind::Char | Kind::Pointer(_) => {
            return Err(SchemaError::UnsupportedType {
                ty: ty.name(),
                kind: kind.name(),
            })
        }
    };
    Ok(typ3)
}
