//! Sequential walk over a descriptor array plus per-field resolution of
//! the indirect extra value.

use crate::config::DecodeConfig;
use crate::consts::SENTINEL_TAG;
use crate::errors::{PbreconError, Result};
use crate::memory::MemorySource;
use crate::record::{ExtraValue, FieldInfo, RawRecord};
use crate::scalar::{split_type_byte, ScalarCodec, ScalarType};
use tracing::{debug, trace};

/// Walks descriptor arrays in one memory image under one configuration.
pub struct Decoder<'a, M, C> {
    mem: &'a M,
    codec: C,
    config: DecodeConfig,
}

impl<'a, M: MemorySource, C: ScalarCodec> Decoder<'a, M, C> {
    pub fn new(mem: &'a M, codec: C, config: DecodeConfig) -> Self {
        Self { mem, codec, config }
    }

    /// Session configuration, for consumers that need the field width,
    /// its sentinel value, or the record stride when rendering.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode the descriptor array starting at `start`, stopping at the
    /// zero-tag terminator (which is not emitted). Fails with
    /// [`PbreconError::UnterminatedDescriptorArray`] once
    /// `config.max_fields` records have been read without a terminator.
    pub fn decode_message(&self, start: u64) -> Result<Vec<FieldInfo>> {
        let stride = self.config.record_stride();
        let mut fields = Vec::new();
        let mut cursor = start;

        debug!(start = %format_args!("{start:#x}"), stride, "descriptor walk");

        loop {
            let buf = self.mem.read(cursor, stride)?;
            let raw = RawRecord::unpack(&buf, self.config.pointer_width)?;
            if raw.tag == SENTINEL_TAG {
                break;
            }
            if fields.len() >= self.config.max_fields {
                return Err(PbreconError::UnterminatedDescriptorArray {
                    limit: self.config.max_fields,
                });
            }

            let tb = split_type_byte(&self.codec, raw.type_byte)?;
            let extra = if raw.extra == 0 {
                None
            } else {
                Some(self.resolve_extra(tb.scalar, raw.data_size, raw.extra)?)
            };

            trace!(
                addr = %format_args!("{cursor:#x}"),
                tag = raw.tag,
                scalar = ?tb.scalar,
                repeat = ?tb.repeat,
                extra = ?extra,
                "field"
            );

            fields.push(FieldInfo {
                tag: raw.tag,
                scalar: tb.scalar,
                repeat: tb.repeat,
                alloc: tb.alloc,
                data_offset: raw.data_offset,
                size_offset: raw.size_offset,
                data_size: raw.data_size,
                array_size: raw.array_size,
                extra,
            });
            cursor += stride as u64;
        }

        debug!(count = fields.len(), "descriptor walk done");
        Ok(fields)
    }

    /// Resolve the typed value behind `addr`. Only indirect reads; the
    /// primary cursor is untouched.
    fn resolve_extra(&self, scalar: ScalarType, data_size: u32, addr: u64) -> Result<ExtraValue> {
        Ok(match scalar {
            ScalarType::Fixed32 => ExtraValue::Unsigned(u64::from(self.mem.read_u32(addr)?)),
            ScalarType::Fixed64 => ExtraValue::Unsigned(self.mem.read_u64(addr)?),
            ScalarType::Int | ScalarType::Uint | ScalarType::Sint => {
                let (raw, bits) = match data_size {
                    1 => (u64::from(self.mem.read_u8(addr)?), 8),
                    2 => (u64::from(self.mem.read_u16(addr)?), 16),
                    4 => (u64::from(self.mem.read_u32(addr)?), 32),
                    _ => (self.mem.read_u64(addr)?, 64),
                };
                if scalar == ScalarType::Uint {
                    ExtraValue::Unsigned(raw)
                } else {
                    ExtraValue::Signed(sign_extend(raw, bits))
                }
            }
            ScalarType::FixedLengthBytes => {
                ExtraValue::Bytes(self.mem.read(addr, data_size as usize)?)
            }
            ScalarType::Bytes => {
                let prefix_bytes = self.config.field_width.bytes();
                let len = match prefix_bytes {
                    1 => u64::from(self.mem.read_u8(addr)?),
                    2 => u64::from(self.mem.read_u16(addr)?),
                    _ => u64::from(self.mem.read_u32(addr)?),
                };
                ExtraValue::Bytes(self.mem.read(addr + prefix_bytes, len as usize)?)
            }
            ScalarType::String => {
                let mut s = String::new();
                let mut chars = 0u32;
                let mut at = addr;
                // stop at NUL or after data_size characters; bytes map to
                // chars as Latin-1
                while chars < data_size {
                    let b = self.mem.read_u8(at)?;
                    if b == 0 {
                        break;
                    }
                    s.push(char::from(b));
                    chars += 1;
                    at += 1;
                }
                ExtraValue::Text(s)
            }
            ScalarType::Bool | ScalarType::Submessage | ScalarType::Extension => {
                ExtraValue::Address(addr)
            }
        })
    }
}

/// Two's-complement reinterpretation of the low `bits` bits of `raw`.
fn sign_extend(raw: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((raw << shift) as i64) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extend_all_widths() {
        assert_eq!(sign_extend(0xFF, 8), -1);
        assert_eq!(sign_extend(0x80, 8), -128);
        assert_eq!(sign_extend(0x7F, 8), 127);
        assert_eq!(sign_extend(0xFFFE, 16), -2);
        assert_eq!(sign_extend(0x8000, 16), -32768);
        assert_eq!(sign_extend(0xFFFF_FFFE, 32), -2);
        assert_eq!(sign_extend(0x7FFF_FFFF, 32), i64::from(i32::MAX));
        assert_eq!(sign_extend(u64::MAX, 64), -1);
        assert_eq!(sign_extend(1u64 << 63, 64), i64::MIN);
        assert_eq!(sign_extend(42, 64), 42);
    }
}
