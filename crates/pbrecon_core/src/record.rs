//! Descriptor record layout and the decoded field model.
//!
//! Record layout (LE), 28 or 32 bytes depending on pointer width:
//!   tag[4]         field tag; 0 terminates the array
//!   type[1]        bits 0-3 scalar code, 4-5 repeat rule, 6-7 allocation
//!   pad[3]
//!   data_offset[4] offset of the value inside the containing struct
//!   size_offset[4] signed offset of the repeat-count field, or -1
//!   data_size[4]   size in bytes of one data element
//!   array_size[4]  max element count for repeated fields
//!   extra[4|8]     pointer to a default/aux value, or 0 for none

use crate::config::PointerWidth;
use crate::errors::Result;
use crate::scalar::{AllocationType, RepeatRule, ScalarType};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// One descriptor record as it sits in memory, before type dispatch.
/// Ephemeral; consumed within a single decode pass.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord {
    pub tag: u32,
    pub type_byte: u8,
    pub data_offset: u32,
    pub size_offset: i32,
    pub data_size: u32,
    pub array_size: u32,
    pub extra: u64,
}

impl RawRecord {
    /// Unpack one record from `buf`, which must hold exactly one stride.
    pub fn unpack(buf: &[u8], pointer_width: PointerWidth) -> Result<Self> {
        let mut cur = Cursor::new(buf);
        let tag = cur.read_u32::<LE>()?;
        let type_byte = cur.read_u8()?;
        cur.set_position(cur.position() + 3); // padding
        let data_offset = cur.read_u32::<LE>()?;
        let size_offset = cur.read_i32::<LE>()?;
        let data_size = cur.read_u32::<LE>()?;
        let array_size = cur.read_u32::<LE>()?;
        let extra = match pointer_width {
            PointerWidth::Bits32 => u64::from(cur.read_u32::<LE>()?),
            PointerWidth::Bits64 => cur.read_u64::<LE>()?,
        };
        Ok(Self { tag, type_byte, data_offset, size_offset, data_size, array_size, extra })
    }
}

/// Resolved extra value; the shape follows the field's scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtraValue {
    Unsigned(u64),
    Signed(i64),
    Bytes(Vec<u8>),
    Text(String),
    /// An address the core keeps opaque (submessage descriptors,
    /// extension chains, bool defaults).
    Address(u64),
}

/// One decoded schema field. Immutable output of the decode pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub tag: u32,
    pub scalar: ScalarType,
    pub repeat: RepeatRule,
    pub alloc: AllocationType,
    pub data_offset: u32,
    pub size_offset: i32,
    pub data_size: u32,
    pub array_size: u32,
    pub extra: Option<ExtraValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_bytes(tag: u32, extra: u64, ptr: PointerWidth) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&tag.to_le_bytes());
        b.push(0x12); // type byte
        b.extend_from_slice(&[0xAA, 0xBB, 0xCC]); // padding, ignored
        b.extend_from_slice(&8u32.to_le_bytes()); // data_offset
        b.extend_from_slice(&(-1i32).to_le_bytes()); // size_offset
        b.extend_from_slice(&4u32.to_le_bytes()); // data_size
        b.extend_from_slice(&1u32.to_le_bytes()); // array_size
        match ptr {
            PointerWidth::Bits32 => b.extend_from_slice(&(extra as u32).to_le_bytes()),
            PointerWidth::Bits64 => b.extend_from_slice(&extra.to_le_bytes()),
        }
        b
    }

    #[test]
    fn unpack_32bit_pointers() {
        let b = record_bytes(7, 0xDEAD_BEEF, PointerWidth::Bits32);
        assert_eq!(b.len(), 28);
        let r = RawRecord::unpack(&b, PointerWidth::Bits32).unwrap();
        assert_eq!(r.tag, 7);
        assert_eq!(r.type_byte, 0x12);
        assert_eq!(r.data_offset, 8);
        assert_eq!(r.size_offset, -1);
        assert_eq!(r.data_size, 4);
        assert_eq!(r.array_size, 1);
        assert_eq!(r.extra, 0xDEAD_BEEF);
    }

    #[test]
    fn unpack_64bit_pointers() {
        let b = record_bytes(9, 0x1122_3344_5566_7788, PointerWidth::Bits64);
        assert_eq!(b.len(), 32);
        let r = RawRecord::unpack(&b, PointerWidth::Bits64).unwrap();
        assert_eq!(r.tag, 9);
        assert_eq!(r.extra, 0x1122_3344_5566_7788);
    }
}
