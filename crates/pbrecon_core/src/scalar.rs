//! Field type enumerations packed into the descriptor type byte, and the
//! versioned mapping from raw 4-bit codes to scalar kinds.
//!
//! nanopb moved the scalar code assignments between format generations
//! (0.3.9.4 introduced BOOL at 0x00 and shifted everything else up), so the
//! decoder takes the mapping as a capability instead of hard-coding one
//! table. The walk and grouping logic never branch on format version.

use crate::consts::{ALLOC_SHIFT, REPEAT_SHIFT, SCALAR_MASK, TWO_BIT_MASK};
use crate::errors::{PbreconError, Result};
use serde::{Deserialize, Serialize};

/// Semantic field kind. Determines how the extra value is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Int,
    Uint,
    Sint,
    Fixed32,
    Fixed64,
    Bytes,
    String,
    Submessage,
    Extension,
    FixedLengthBytes,
}

/// Field cardinality (nanopb PB_HTYPE, bits 4-5 of the type byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatRule {
    Required,
    Optional,
    Repeated,
    Oneof,
}

/// Storage strategy (nanopb PB_ATYPE, bits 6-7 of the type byte). Carried
/// through undecoded; only three of the four raw values are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationType {
    Static,
    Pointer,
    Callback,
}

/// Mapping from a raw 4-bit scalar code to its semantic kind, one per
/// schema-format generation.
pub trait ScalarCodec {
    fn scalar_type(&self, code: u8) -> Option<ScalarType>;
}

/// Code table for nanopb 0.3.9.4 and later 0.3.x releases (BOOL = 0x00).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Nanopb_0_3_9_4;

impl ScalarCodec for Nanopb_0_3_9_4 {
    fn scalar_type(&self, code: u8) -> Option<ScalarType> {
        Some(match code {
            0x00 => ScalarType::Bool,
            0x01 => ScalarType::Int,
            0x02 => ScalarType::Uint,
            0x03 => ScalarType::Sint,
            0x04 => ScalarType::Fixed32,
            0x05 => ScalarType::Fixed64,
            0x06 => ScalarType::Bytes,
            0x07 => ScalarType::String,
            0x08 => ScalarType::Submessage,
            0x09 => ScalarType::Extension,
            0x0A => ScalarType::FixedLengthBytes,
            _ => return None,
        })
    }
}

/// Code table for 0.3.x releases before 0.3.9.4. No BOOL scalar; every
/// code sits one below its 0.3.9.4 position.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Nanopb_0_3_x;

impl ScalarCodec for Nanopb_0_3_x {
    fn scalar_type(&self, code: u8) -> Option<ScalarType> {
        Some(match code {
            0x00 => ScalarType::Int,
            0x01 => ScalarType::Uint,
            0x02 => ScalarType::Sint,
            0x03 => ScalarType::Fixed32,
            0x04 => ScalarType::Fixed64,
            0x05 => ScalarType::Bytes,
            0x06 => ScalarType::String,
            0x07 => ScalarType::Submessage,
            0x08 => ScalarType::Extension,
            0x09 => ScalarType::FixedLengthBytes,
            _ => return None,
        })
    }
}

/// The three components packed into the descriptor type byte.
#[derive(Debug, Clone, Copy)]
pub struct TypeByte {
    pub scalar: ScalarType,
    pub repeat: RepeatRule,
    pub alloc: AllocationType,
}

/// Split a packed type byte: bits 0-3 scalar code (via `codec`), bits 4-5
/// repeat rule, bits 6-7 allocation type.
pub fn split_type_byte<C: ScalarCodec>(codec: &C, raw: u8) -> Result<TypeByte> {
    let code = raw & SCALAR_MASK;
    let scalar = codec
        .scalar_type(code)
        .ok_or(PbreconError::UnknownScalarType { code })?;
    let repeat = match (raw >> REPEAT_SHIFT) & TWO_BIT_MASK {
        0 => RepeatRule::Required,
        1 => RepeatRule::Optional,
        2 => RepeatRule::Repeated,
        _ => RepeatRule::Oneof,
    };
    let alloc = match (raw >> ALLOC_SHIFT) & TWO_BIT_MASK {
        0 => AllocationType::Static,
        1 => AllocationType::Pointer,
        2 => AllocationType::Callback,
        raw => return Err(PbreconError::UnknownAllocationType { raw }),
    };
    Ok(TypeByte { scalar, repeat, alloc })
}
