use crate::consts::{DEFAULT_MAX_FIELDS, RECORD_FIXED_SIZE};
use crate::errors::{PbreconError, Result};
use serde::{Deserialize, Serialize};

/// Width of the length field used for dynamically sized values
/// (PB_FIELD_16BIT / PB_FIELD_32BIT builds of the encoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldWidth {
    W8,
    W16,
    W32,
}

impl FieldWidth {
    /// Accepts 8, 16 or 32; anything else is a caller error, rejected
    /// before a decoder exists.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(FieldWidth::W8),
            16 => Ok(FieldWidth::W16),
            32 => Ok(FieldWidth::W32),
            other => Err(PbreconError::InvalidFieldWidth(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            FieldWidth::W8 => 8,
            FieldWidth::W16 => 16,
            FieldWidth::W32 => 32,
        }
    }

    /// Byte width of a length prefix at this field width.
    pub fn bytes(self) -> u64 {
        u64::from(self.bits() / 8)
    }

    /// All-bits-set value for this width. Used as a data_offset marker
    /// meaning "same oneof group as the previous field".
    pub fn sentinel(self) -> u64 {
        (1u64 << self.bits()) - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub fn bytes(self) -> usize {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }
}

/// Layout parameters for one decoding session. Fixed at construction;
/// every decode is a pure function of (memory contents, config).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecodeConfig {
    pub field_width: FieldWidth,
    pub pointer_width: PointerWidth,
    /// Upper bound on records walked before giving up on finding the
    /// terminator. The original scanner had no bound and relied on the
    /// host faulting; this is a deliberate deviation.
    pub max_fields: usize,
}

impl DecodeConfig {
    pub fn new(field_width: FieldWidth, pointer_width: PointerWidth) -> Self {
        Self { field_width, pointer_width, max_fields: DEFAULT_MAX_FIELDS }
    }

    pub fn with_max_fields(mut self, max_fields: usize) -> Self {
        self.max_fields = max_fields;
        self
    }

    /// Byte stride between consecutive descriptor records (28 or 32).
    pub fn record_stride(&self) -> usize {
        RECORD_FIXED_SIZE + self.pointer_width.bytes()
    }
}
