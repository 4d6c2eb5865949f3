// crates/pbrecon_core/src/consts.rs

/// Tag value marking the end of a descriptor array. The terminator record
/// itself is never emitted.
pub const SENTINEL_TAG: u32 = 0;

/// Fixed part of a descriptor record: tag(4) + type(1) + pad(3) +
/// data_offset(4) + size_offset(4) + data_size(4) + array_size(4).
/// The extra slot (4 or 8 bytes of pointer) follows.
pub const RECORD_FIXED_SIZE: usize = 24;

/// Bit masks for the packed type byte.
pub const SCALAR_MASK: u8 = 0b1111;
pub const REPEAT_SHIFT: u8 = 4;
pub const ALLOC_SHIFT: u8 = 6;
pub const TWO_BIT_MASK: u8 = 0b11;

/// Walk bound for descriptor arrays with no terminator. The original
/// scanner loops until it reads a zero tag or faults; we stop here instead.
pub const DEFAULT_MAX_FIELDS: usize = 1024;

const _: () = { assert!(RECORD_FIXED_SIZE + 8 == 32); };
