//! Byte-level access to a raw ELF image

use crate::formats::elf::types::{ElfError, Result, ELF_MAGIC};

/// Bounds-checked little-endian reader over the whole file contents.
///
/// Construction validates the ELF magic, so every `ByteReader` is known to
/// wrap something that at least claims to be an ELF file.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'data> {
    data: &'data [u8],
}

impl<'data> ByteReader<'data> {
    /// Wrap raw file contents, rejecting anything that does not start with `\x7fELF`.
    pub fn new(data: &'data [u8]) -> Result<Self> {
        if data.len() < ELF_MAGIC.len() || &data[..ELF_MAGIC.len()] != ELF_MAGIC {
            return Err(ElfError::InvalidMagic);
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Little-endian unsigned integer of `count` bytes (1, 2 or 4) at `start`.
    pub fn get(&self, start: usize, count: usize) -> Result<u32> {
        if !matches!(count, 1 | 2 | 4) {
            return Err(ElfError::InvalidOffset { offset: start });
        }
        let bytes = self.slice(start, count)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
    }

    pub fn read_u8(&self, start: usize) -> Result<u8> {
        Ok(self.slice(start, 1)?[0])
    }

    pub fn read_u16(&self, start: usize) -> Result<u16> {
        let b = self.slice(start, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&self, start: usize) -> Result<u32> {
        let b = self.slice(start, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// The 32-bit instruction word stored little-endian at `start`.
    pub fn word_at(&self, start: usize) -> Result<u32> {
        self.read_u32(start)
    }

    /// Null-terminated string at `start`, one char per byte.
    ///
    /// Without a terminator the string runs to the end of the file.
    pub fn read_cstring(&self, start: usize) -> Result<String> {
        if start > self.data.len() {
            return Err(ElfError::InvalidOffset { offset: start });
        }
        let tail = &self.data[start..];
        let end = memchr::memchr(0, tail).unwrap_or(tail.len());
        Ok(tail[..end].iter().map(|&b| char::from(b)).collect())
    }

    /// Sub-slice `[start, start + len)`, failing instead of reading past the end.
    pub fn slice(&self, start: usize, len: usize) -> Result<&'data [u8]> {
        check_bounds(start, len, self.data.len())?;
        Ok(&self.data[start..start + len])
    }
}

/// Check if a range is within bounds
pub fn check_bounds(offset: usize, size: usize, data_len: usize) -> Result<()> {
    match offset.checked_add(size) {
        Some(end) if end <= data_len => Ok(()),
        _ => Err(ElfError::Truncated {
            offset,
            needed: size,
        }),
    }
}
