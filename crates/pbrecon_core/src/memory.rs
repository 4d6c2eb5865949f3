//! Random-access byte reads over an address space.
//!
//! The decoder never owns the bytes it walks; it consumes a [`MemorySource`]
//! supplied by the host (a loaded firmware image, a process dump, ...).
//! [`MemoryImage`] is the bundled implementation: a byte region mapped at a
//! base address, either owned in memory or mmap'd from a dump file.

use crate::errors::{PbreconError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Random-access reads over an address space. All multi-byte reads are
/// little-endian.
pub trait MemorySource {
    /// Read exactly `len` bytes starting at `addr`.
    fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>>;

    fn read_u8(&self, addr: u64) -> Result<u8> {
        let b = self.read(addr, 1)?;
        Ok(b[0])
    }

    fn read_u16(&self, addr: u64) -> Result<u16> {
        let b = self.read(addr, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&self, addr: u64) -> Result<u32> {
        let b = self.read(addr, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&self, addr: u64) -> Result<u64> {
        let b = self.read(addr, 8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }
}

enum ImageBytes {
    Owned(Vec<u8>),
    Mapped { _f: File, mmap: Mmap },
}

impl ImageBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            ImageBytes::Owned(v) => v,
            ImageBytes::Mapped { mmap, .. } => mmap,
        }
    }
}

/// A contiguous byte region mapped at `base`. Addresses passed to [`read`]
/// are absolute; `base` is subtracted before indexing.
///
/// [`read`]: MemorySource::read
pub struct MemoryImage {
    base: u64,
    bytes: ImageBytes,
}

impl MemoryImage {
    pub fn from_vec(base: u64, bytes: Vec<u8>) -> Self {
        Self { base, bytes: ImageBytes::Owned(bytes) }
    }

    /// mmap a raw dump file as the image contents.
    pub fn map_file(base: u64, path: impl AsRef<Path>) -> Result<Self> {
        let f = File::open(path)?;
        let mmap = unsafe { Mmap::map(&f)? };
        Ok(Self { base, bytes: ImageBytes::Mapped { _f: f, mmap } })
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.as_slice().is_empty()
    }
}

impl MemorySource for MemoryImage {
    fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
        let start = addr
            .checked_sub(self.base)
            .ok_or(PbreconError::OutOfBounds { addr, len })? as usize;
        let end = start
            .checked_add(len)
            .ok_or(PbreconError::OutOfBounds { addr, len })?;
        let slice = self.bytes.as_slice();
        if end > slice.len() {
            return Err(PbreconError::OutOfBounds { addr, len });
        }
        Ok(slice[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_little_endian() {
        let img = MemoryImage::from_vec(0x1000, vec![0x2A, 0x00, 0x01, 0x02, 0xFF, 0, 0, 0]);
        assert_eq!(img.read_u8(0x1000).unwrap(), 0x2A);
        assert_eq!(img.read_u16(0x1000).unwrap(), 0x002A);
        assert_eq!(img.read_u32(0x1000).unwrap(), 0x0201_002A);
        assert_eq!(img.read_u64(0x1000).unwrap(), 0x0000_00FF_0201_002A);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let img = MemoryImage::from_vec(0x1000, vec![0u8; 4]);
        assert!(matches!(
            img.read(0x0FFF, 1),
            Err(PbreconError::OutOfBounds { .. })
        ));
        assert!(matches!(
            img.read(0x1002, 4),
            Err(PbreconError::OutOfBounds { .. })
        ));
        assert_eq!(img.read(0x1000, 4).unwrap().len(), 4);
    }
}
