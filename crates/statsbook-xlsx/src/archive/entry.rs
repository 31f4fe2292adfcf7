//! One indexed archive entry

use std::ops::Range;

use super::cursor::{patch_u16, patch_u32};

/// Record signatures
pub(crate) const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
pub(crate) const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
pub(crate) const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;
pub(crate) const DATA_DESCRIPTOR_SIG: u32 = 0x0807_4b50;

/// Fixed record sizes (before the variable-length name/extra/comment)
pub(crate) const LOCAL_HEADER_LEN: usize = 30;
pub(crate) const CENTRAL_HEADER_LEN: usize = 46;
pub(crate) const END_OF_CENTRAL_DIR_LEN: usize = 22;

/// General-purpose flag bits
pub(crate) const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
pub(crate) const FLAG_UTF8: u16 = 1 << 11;

// Field offsets inside the local header
pub(crate) const LOCAL_FLAGS: usize = 6;
pub(crate) const LOCAL_METHOD: usize = 8;
pub(crate) const LOCAL_CRC: usize = 14;
pub(crate) const LOCAL_COMPRESSED: usize = 18;
pub(crate) const LOCAL_UNCOMPRESSED: usize = 22;

// Field offsets inside the central directory header
pub(crate) const CENTRAL_FLAGS: usize = 0x08;
pub(crate) const CENTRAL_METHOD: usize = 0x0A;
pub(crate) const CENTRAL_CRC: usize = 0x10;
pub(crate) const CENTRAL_COMPRESSED: usize = 0x14;
pub(crate) const CENTRAL_UNCOMPRESSED: usize = 0x18;
pub(crate) const CENTRAL_LOCAL_OFFSET: usize = 0x2A;

/// Compression method of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflated,
    /// Any other declared method; readable only as an error
    Other(u16),
}

impl CompressionMethod {
    pub fn from_id(id: u16) -> Self {
        match id {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflated,
            other => CompressionMethod::Other(other),
        }
    }

    pub fn id(self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflated => 8,
            CompressionMethod::Other(id) => id,
        }
    }
}

/// An archive entry, located once when the container is indexed
///
/// The raw header bytes are kept so a save can write them back unchanged;
/// only the fields a replacement touches are ever patched.
#[derive(Debug, Clone)]
pub struct ZipEntry {
    pub(crate) name: String,
    /// Offset of the local header in the original buffer
    pub(crate) local_offset: usize,
    /// Local header, file name and extra field
    pub(crate) local_header: Vec<u8>,
    /// Central directory header, file name, extra field and comment
    pub(crate) central_header: Vec<u8>,
    /// Compressed payload in the original buffer
    pub(crate) payload: Range<usize>,
    /// Trailing data descriptor, signature included when present
    pub(crate) descriptor: Option<Vec<u8>>,
    pub(crate) method: CompressionMethod,
    pub(crate) crc32: u32,
    pub(crate) compressed_size: u32,
    pub(crate) uncompressed_size: u32,
    /// Compressed payload that replaces the original on save
    pub(crate) replacement: Option<Vec<u8>>,
}

impl ZipEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    pub fn compressed_size(&self) -> u32 {
        self.compressed_size
    }

    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// Whether a data descriptor follows the payload
    pub fn has_descriptor(&self) -> bool {
        self.descriptor.is_some()
    }

    /// Whether a replacement payload is pending
    pub fn is_modified(&self) -> bool {
        self.replacement.is_some()
    }

    /// Full span of the original record: header, payload and descriptor
    pub fn record_range(&self) -> Range<usize> {
        let descriptor_len = self.descriptor.as_ref().map_or(0, Vec::len);
        self.local_offset..self.payload.end + descriptor_len
    }

    /// Install an already-compressed payload and rewrite the header fields
    /// that describe it in both copies of the header
    ///
    /// Sizes and CRC are known up front now, so the descriptor flag is
    /// cleared and the descriptor dropped.
    pub(crate) fn set_replacement(
        &mut self,
        method: CompressionMethod,
        crc32: u32,
        compressed: Vec<u8>,
        compressed_size: u32,
        uncompressed_size: u32,
    ) {
        self.method = method;
        self.crc32 = crc32;
        self.compressed_size = compressed_size;
        self.uncompressed_size = uncompressed_size;
        self.descriptor = None;

        let local = &mut self.local_header;
        let flags = u16::from_le_bytes([local[LOCAL_FLAGS], local[LOCAL_FLAGS + 1]]);
        patch_u16(local, LOCAL_FLAGS, flags & !FLAG_DATA_DESCRIPTOR);
        patch_u16(local, LOCAL_METHOD, method.id());
        patch_u32(local, LOCAL_CRC, crc32);
        patch_u32(local, LOCAL_COMPRESSED, compressed_size);
        patch_u32(local, LOCAL_UNCOMPRESSED, uncompressed_size);

        let central = &mut self.central_header;
        let flags = u16::from_le_bytes([central[CENTRAL_FLAGS], central[CENTRAL_FLAGS + 1]]);
        patch_u16(central, CENTRAL_FLAGS, flags & !FLAG_DATA_DESCRIPTOR);
        patch_u16(central, CENTRAL_METHOD, method.id());
        patch_u32(central, CENTRAL_CRC, crc32);
        patch_u32(central, CENTRAL_COMPRESSED, compressed_size);
        patch_u32(central, CENTRAL_UNCOMPRESSED, uncompressed_size);

        self.replacement = Some(compressed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_method_ids() {
        assert_eq!(CompressionMethod::from_id(0), CompressionMethod::Stored);
        assert_eq!(CompressionMethod::from_id(8), CompressionMethod::Deflated);
        assert_eq!(CompressionMethod::from_id(12), CompressionMethod::Other(12));
        assert_eq!(CompressionMethod::Other(14).id(), 14);
    }
}
