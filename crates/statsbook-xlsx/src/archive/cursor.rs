//! Little-endian field access with bounds checks
//!
//! Every read goes through [`ByteCursor`] or [`read_u32_at`], so a corrupt
//! length or offset turns into [`ZipError::Truncated`] instead of a panic.

use super::error::{ZipError, ZipResult};

/// Forward reader over a byte slice
#[derive(Debug, Clone)]
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Take the next `len` bytes
    pub(crate) fn bytes(&mut self, len: usize) -> ZipResult<&'a [u8]> {
        let slice = slice_at(self.data, self.pos, len)?;
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> ZipResult<()> {
        self.bytes(len).map(|_| ())
    }

    pub(crate) fn u16(&mut self) -> ZipResult<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self) -> ZipResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// `len` bytes starting at `offset`
pub(crate) fn slice_at(data: &[u8], offset: usize, len: usize) -> ZipResult<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ZipError::Truncated {
            offset,
            needed: len,
        })
}

pub(crate) fn read_u16_at(data: &[u8], offset: usize) -> ZipResult<u16> {
    ByteCursor::new(data, offset).u16()
}

pub(crate) fn read_u32_at(data: &[u8], offset: usize) -> ZipResult<u32> {
    ByteCursor::new(data, offset).u32()
}

/// Overwrite a little-endian `u16` field of a header we own
///
/// Header buffers are sized when they are indexed, so the offsets used
/// with these are always in range.
pub(crate) fn patch_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn patch_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
