//! ZIP container with in-place entry replacement
//!
//! The container keeps the original archive bytes and an index of its
//! entries. Reading decompresses on demand. Replacing an entry only records
//! a new compressed payload; [`ZipContainer::save`] then re-emits the whole
//! archive, copying every untouched record verbatim so that a save with no
//! replacements reproduces the input exactly.

use std::io::{Read, Write};

use ahash::AHashMap;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use log::{debug, trace, warn};

use super::cursor::{patch_u16, patch_u32, read_u16_at, read_u32_at, slice_at, ByteCursor};
use super::entry::*;
use super::error::{ZipError, ZipResult};

/// Longest possible archive comment
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Best deflate compression ratio; bounds the output of a payload
const MAX_DEFLATE_RATIO: usize = 1032;

/// Largest output buffer reserved up front when inflating
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

/// An indexed ZIP archive
#[derive(Debug, Clone)]
pub struct ZipContainer {
    data: Vec<u8>,
    /// Entries in central directory order
    entries: Vec<ZipEntry>,
    /// Name to position in `entries`; a repeated name maps to its last record
    index: AHashMap<String, usize>,
    /// End of central directory record, comment included
    end_of_central_dir: Vec<u8>,
    /// Start of the central directory in the original buffer
    central_dir_offset: usize,
    verify_checksums: bool,
}

impl ZipContainer {
    /// Index an archive held in memory
    pub fn new(data: Vec<u8>) -> ZipResult<Self> {
        let eocd_offset = find_end_of_central_dir(&data)?;
        let mut eocd = ByteCursor::new(&data, eocd_offset + 4);
        let disk = eocd.u16()?;
        let _cd_disk = eocd.u16()?;
        let _disk_entries = eocd.u16()?;
        let total_entries = eocd.u16()?;
        let cd_size = eocd.u32()?;
        let cd_offset = eocd.u32()?;
        let comment_len = usize::from(eocd.u16()?);

        if disk != 0 {
            return Err(ZipError::InvalidArchive(
                "multi-disk archives are not supported".into(),
            ));
        }
        if total_entries == u16::MAX || cd_size == u32::MAX || cd_offset == u32::MAX {
            return Err(ZipError::Zip64Unsupported);
        }

        let end_of_central_dir =
            slice_at(&data, eocd_offset, END_OF_CENTRAL_DIR_LEN + comment_len)?.to_vec();

        let cd_offset = cd_offset as usize;
        let mut entries: Vec<ZipEntry> = Vec::with_capacity(usize::from(total_entries));
        let mut pos = cd_offset;
        for _ in 0..total_entries {
            let (entry, next) = read_central_record(&data, pos)?;
            pos = next;
            if let Some(entry) = entry {
                trace!(
                    "zip entry {} at {} ({:?}, {} -> {} bytes)",
                    entry.name,
                    entry.local_offset,
                    entry.method,
                    entry.compressed_size,
                    entry.uncompressed_size
                );
                entries.push(entry);
            }
        }

        let mut index = AHashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.insert(entry.name.clone(), i);
        }

        debug!("indexed zip archive: {} entries", entries.len());

        Ok(Self {
            data,
            entries,
            index,
            end_of_central_dir,
            central_dir_offset: cd_offset,
            verify_checksums: true,
        })
    }

    /// Enable or disable CRC-32 checks on decompressed payloads
    pub fn with_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entry names in central directory order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Look up an entry's metadata
    pub fn entry(&self, name: &str) -> Option<&ZipEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// The original archive bytes
    pub fn original_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Decompressed contents of an entry
    ///
    /// A pending replacement is returned in place of the original payload.
    pub fn data(&self, name: &str) -> ZipResult<Vec<u8>> {
        let entry = self
            .entry(name)
            .ok_or_else(|| ZipError::EntryNotFound(name.to_string()))?;

        let raw = match &entry.replacement {
            Some(payload) => payload.as_slice(),
            None => slice_at(&self.data, entry.payload.start, entry.payload.len())?,
        };
        let expected_len = entry.uncompressed_size as usize;

        let contents = match entry.method {
            CompressionMethod::Stored => raw.to_vec(),
            CompressionMethod::Deflated => {
                // the declared size is untrusted until the payload inflates
                let capacity = expected_len
                    .min(raw.len().saturating_mul(MAX_DEFLATE_RATIO))
                    .min(MAX_PREALLOCATION);
                let mut out = Vec::with_capacity(capacity);
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
                out
            }
            CompressionMethod::Other(method) => {
                return Err(ZipError::UnsupportedCompression {
                    name: name.to_string(),
                    method,
                })
            }
        };

        if contents.len() != expected_len {
            return Err(ZipError::SizeMismatch {
                name: name.to_string(),
                expected: expected_len as u64,
                actual: contents.len() as u64,
            });
        }
        if self.verify_checksums {
            let actual = crc32fast::hash(&contents);
            if actual != entry.crc32 {
                return Err(ZipError::ChecksumMismatch {
                    name: name.to_string(),
                    expected: entry.crc32,
                    actual,
                });
            }
        }
        Ok(contents)
    }

    /// Replace an entry's contents
    ///
    /// The payload is deflated, or stored when deflating does not make it
    /// smaller. Nothing is written until [`save`](Self::save).
    pub fn replace(&mut self, name: &str, contents: &[u8]) -> ZipResult<()> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| ZipError::EntryNotFound(name.to_string()))?;

        let uncompressed_size = u32::try_from(contents.len())
            .map_err(|_| ZipError::EntryTooLarge(name.to_string()))?;
        let crc = crc32fast::hash(contents);

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(contents)?;
        let deflated = encoder.finish()?;

        let (method, payload) = if deflated.len() < contents.len() {
            (CompressionMethod::Deflated, deflated)
        } else {
            (CompressionMethod::Stored, contents.to_vec())
        };
        let compressed_size = u32::try_from(payload.len())
            .map_err(|_| ZipError::EntryTooLarge(name.to_string()))?;

        debug!(
            "replacing zip entry {} ({:?}, {} -> {} bytes)",
            name, method, compressed_size, uncompressed_size
        );
        self.entries[i].set_replacement(method, crc, payload, compressed_size, uncompressed_size);
        Ok(())
    }

    /// Serialize the archive with all pending replacements
    ///
    /// Records are written in their original order of appearance, after
    /// any bytes that preceded the first record. The central directory
    /// keeps its own order, with each local header offset corrected.
    pub fn save(&self) -> ZipResult<Vec<u8>> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&i| self.entries[i].local_offset);

        let prefix_end = order
            .first()
            .map_or(self.central_dir_offset, |&i| self.entries[i].local_offset)
            .min(self.data.len());

        let mut out = Vec::with_capacity(self.data.len());
        out.extend_from_slice(&self.data[..prefix_end]);

        let mut new_offsets = vec![0u32; self.entries.len()];
        for &i in &order {
            let entry = &self.entries[i];
            new_offsets[i] = offset_u32(out.len(), &entry.name)?;
            out.extend_from_slice(&entry.local_header);
            match &entry.replacement {
                Some(payload) => out.extend_from_slice(payload),
                None => {
                    out.extend_from_slice(slice_at(
                        &self.data,
                        entry.payload.start,
                        entry.payload.len(),
                    )?);
                }
            }
            if let Some(descriptor) = &entry.descriptor {
                out.extend_from_slice(descriptor);
            }
        }

        let cd_start = out.len();
        for (entry, &offset) in self.entries.iter().zip(&new_offsets) {
            let start = out.len();
            out.extend_from_slice(&entry.central_header);
            patch_u32(&mut out[start..], CENTRAL_LOCAL_OFFSET, offset);
        }
        let cd_size = out.len() - cd_start;

        let entry_count =
            u16::try_from(self.entries.len()).map_err(|_| ZipError::Zip64Unsupported)?;
        let eocd_start = out.len();
        out.extend_from_slice(&self.end_of_central_dir);
        let eocd = &mut out[eocd_start..];
        patch_u16(eocd, 8, entry_count);
        patch_u16(eocd, 10, entry_count);
        patch_u32(eocd, 12, offset_u32(cd_size, "central directory")?);
        patch_u32(eocd, 16, offset_u32(cd_start, "central directory")?);

        Ok(out)
    }
}

fn offset_u32(value: usize, what: &str) -> ZipResult<u32> {
    u32::try_from(value).map_err(|_| ZipError::EntryTooLarge(what.to_string()))
}

/// Scan backward for the end of central directory signature
///
/// The record may be followed by a comment of up to 64 KiB.
fn find_end_of_central_dir(data: &[u8]) -> ZipResult<usize> {
    if data.len() < END_OF_CENTRAL_DIR_LEN {
        return Err(ZipError::InvalidArchive(format!(
            "{} bytes is too short for a zip archive",
            data.len()
        )));
    }
    let last = data.len() - END_OF_CENTRAL_DIR_LEN;
    let first = last.saturating_sub(MAX_COMMENT_LEN);
    (first..=last)
        .rev()
        .find(|&pos| read_u32_at(data, pos).ok() == Some(END_OF_CENTRAL_DIR_SIG))
        .ok_or_else(|| ZipError::InvalidArchive("end of central directory not found".into()))
}

/// Decode a file name: UTF-8 when flagged, otherwise code page 437, which
/// agrees with Latin-1 for the names archives actually use
fn decode_name(raw: &[u8], flags: u16) -> String {
    if flags & FLAG_UTF8 != 0 {
        String::from_utf8_lossy(raw).into_owned()
    } else {
        raw.iter().map(|&b| char::from(b)).collect()
    }
}

/// Read the central record at `pos` and the local record it points to
///
/// Returns the entry (or `None` when its local header is not where the
/// central record says) and the position of the next central record.
fn read_central_record(data: &[u8], pos: usize) -> ZipResult<(Option<ZipEntry>, usize)> {
    let mut cursor = ByteCursor::new(data, pos);
    if cursor.u32()? != CENTRAL_HEADER_SIG {
        return Err(ZipError::InvalidArchive(format!(
            "bad central directory signature at offset {}",
            pos
        )));
    }
    cursor.skip(4)?; // versions
    let flags = cursor.u16()?;
    let method = cursor.u16()?;
    cursor.skip(4)?; // mod time, date
    let crc32 = cursor.u32()?;
    let compressed_size = cursor.u32()?;
    let uncompressed_size = cursor.u32()?;
    let name_len = usize::from(cursor.u16()?);
    let extra_len = usize::from(cursor.u16()?);
    let comment_len = usize::from(cursor.u16()?);
    cursor.skip(8)?; // disk, attributes
    let local_offset = cursor.u32()?;
    let name = decode_name(cursor.bytes(name_len)?, flags);
    cursor.skip(extra_len + comment_len)?;
    let next = cursor.position();

    if compressed_size == u32::MAX || uncompressed_size == u32::MAX || local_offset == u32::MAX {
        return Err(ZipError::Zip64Unsupported);
    }

    let central_header = data[pos..next].to_vec();
    let local_offset = local_offset as usize;

    if read_u32_at(data, local_offset).ok() != Some(LOCAL_HEADER_SIG) {
        warn!(
            "skipping zip entry {}: no local header at offset {}",
            name, local_offset
        );
        return Ok((None, next));
    }
    let local_flags = read_u16_at(data, local_offset + LOCAL_FLAGS)?;
    let local_name_len = usize::from(read_u16_at(data, local_offset + 26)?);
    let local_extra_len = usize::from(read_u16_at(data, local_offset + 28)?);

    let header_len = LOCAL_HEADER_LEN + local_name_len + local_extra_len;
    let local_header = slice_at(data, local_offset, header_len)?.to_vec();

    let payload_start = local_offset + header_len;
    let payload_len = compressed_size as usize;
    slice_at(data, payload_start, payload_len)?;
    let payload = payload_start..payload_start + payload_len;

    let descriptor = if local_flags & FLAG_DATA_DESCRIPTOR != 0 {
        let len = if read_u32_at(data, payload.end).ok() == Some(DATA_DESCRIPTOR_SIG) {
            16
        } else {
            12
        };
        Some(slice_at(data, payload.end, len)?.to_vec())
    } else {
        None
    };

    let entry = ZipEntry {
        name,
        local_offset,
        local_header,
        central_header,
        payload,
        descriptor,
        method: CompressionMethod::from_id(method),
        crc32,
        compressed_size,
        uncompressed_size,
        replacement: None,
    };
    Ok((Some(entry), next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn build_archive(files: &[(&str, &[u8], ::zip::CompressionMethod)]) -> Vec<u8> {
        let mut writer = ::zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents, method) in files {
            let options = ::zip::write::SimpleFileOptions::default().compression_method(*method);
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn sample() -> Vec<u8> {
        build_archive(&[
            (
                "xl/workbook.xml",
                b"<workbook><sheets/></workbook>",
                ::zip::CompressionMethod::Deflated,
            ),
            ("mimetype", b"application/zip", ::zip::CompressionMethod::Stored),
            (
                "xl/sharedStrings.xml",
                "<sst>".repeat(200).as_bytes(),
                ::zip::CompressionMethod::Deflated,
            ),
        ])
    }

    /// A single stored entry written with a trailing data descriptor
    fn descriptor_archive(contents: &[u8], with_signature: bool) -> Vec<u8> {
        let name = b"data.txt";
        let crc = crc32fast::hash(contents);
        let size = contents.len() as u32;
        let mut out = Vec::new();

        out.extend_from_slice(&LOCAL_HEADER_SIG.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // version
        out.extend_from_slice(&FLAG_DATA_DESCRIPTOR.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // stored
        out.extend_from_slice(&[0; 4]); // time, date
        out.extend_from_slice(&[0; 12]); // crc and sizes deferred
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(contents);
        if with_signature {
            out.extend_from_slice(&DATA_DESCRIPTOR_SIG.to_le_bytes());
        }
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());

        let cd_start = out.len();
        out.extend_from_slice(&CENTRAL_HEADER_SIG.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&FLAG_DATA_DESCRIPTOR.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&[0; 12]); // extra, comment, disk, attributes
        out.extend_from_slice(&0u32.to_le_bytes()); // local header offset
        out.extend_from_slice(name);
        let cd_size = out.len() - cd_start;

        out.extend_from_slice(&END_OF_CENTRAL_DIR_SIG.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&(cd_size as u32).to_le_bytes());
        out.extend_from_slice(&(cd_start as u32).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }

    #[test]
    fn test_index_and_read() {
        let container = ZipContainer::new(sample()).unwrap();
        assert_eq!(container.len(), 3);
        assert_eq!(
            container.names().collect::<Vec<_>>(),
            vec!["xl/workbook.xml", "mimetype", "xl/sharedStrings.xml"]
        );
        assert_eq!(
            container.data("xl/workbook.xml").unwrap(),
            b"<workbook><sheets/></workbook>"
        );
        assert_eq!(container.data("mimetype").unwrap(), b"application/zip");
        assert_eq!(
            container.entry("mimetype").unwrap().method(),
            CompressionMethod::Stored
        );
        assert!(matches!(
            container.data("missing.xml"),
            Err(ZipError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_noop_save_is_identical() {
        let bytes = sample();
        let container = ZipContainer::new(bytes.clone()).unwrap();
        assert_eq!(container.save().unwrap(), bytes);
    }

    #[test]
    fn test_archive_comment_is_tolerated() {
        let mut writer = ::zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.set_comment("scored by hand");
        writer
            .start_file("a.txt", ::zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let container = ZipContainer::new(bytes.clone()).unwrap();
        assert_eq!(container.data("a.txt").unwrap(), b"hello");
        assert_eq!(container.save().unwrap(), bytes);
    }

    #[test]
    fn test_replace_then_read_back() {
        let mut container = ZipContainer::new(sample()).unwrap();
        let new_contents = "<workbook><sheets><sheet/></sheets></workbook>".repeat(20);
        container
            .replace("xl/workbook.xml", new_contents.as_bytes())
            .unwrap();
        assert!(container.entry("xl/workbook.xml").unwrap().is_modified());
        assert_eq!(
            container.data("xl/workbook.xml").unwrap(),
            new_contents.as_bytes()
        );

        let saved = container.save().unwrap();
        let reopened = ZipContainer::new(saved.clone()).unwrap();
        assert_eq!(
            reopened.data("xl/workbook.xml").unwrap(),
            new_contents.as_bytes()
        );
        assert_eq!(reopened.data("mimetype").unwrap(), b"application/zip");

        // an independent reader agrees
        let mut archive = ::zip::ZipArchive::new(Cursor::new(saved)).unwrap();
        let mut text = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, new_contents);
    }

    #[test]
    fn test_replace_picks_smaller_encoding() {
        let mut container = ZipContainer::new(sample()).unwrap();
        container.replace("mimetype", b"ab").unwrap();
        assert_eq!(
            container.entry("mimetype").unwrap().method(),
            CompressionMethod::Stored
        );
        container
            .replace("xl/sharedStrings.xml", "<si/>".repeat(100).as_bytes())
            .unwrap();
        let entry = container.entry("xl/sharedStrings.xml").unwrap();
        assert_eq!(entry.method(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.uncompressed_size());
    }

    #[test]
    fn test_replace_missing_entry() {
        let mut container = ZipContainer::new(sample()).unwrap();
        assert!(matches!(
            container.replace("nope", b"x"),
            Err(ZipError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_data_descriptor_entries() {
        for with_signature in [false, true] {
            let bytes = descriptor_archive(b"jam 1, lead jammer", with_signature);
            let container = ZipContainer::new(bytes.clone()).unwrap();
            let entry = container.entry("data.txt").unwrap();
            assert!(entry.has_descriptor());
            assert_eq!(
                entry.record_range(),
                0..bytes.len() - container.end_of_central_dir.len() - 46 - 8
            );
            assert_eq!(container.data("data.txt").unwrap(), b"jam 1, lead jammer");
            assert_eq!(container.save().unwrap(), bytes);
        }
    }

    #[test]
    fn test_replace_clears_descriptor() {
        let bytes = descriptor_archive(b"old", true);
        let mut container = ZipContainer::new(bytes).unwrap();
        container.replace("data.txt", b"new contents").unwrap();
        let saved = container.save().unwrap();

        let reopened = ZipContainer::new(saved.clone()).unwrap();
        let entry = reopened.entry("data.txt").unwrap();
        assert!(!entry.has_descriptor());
        assert_eq!(reopened.data("data.txt").unwrap(), b"new contents");
        let flags = read_u16_at(&saved, LOCAL_FLAGS).unwrap();
        assert_eq!(flags & FLAG_DATA_DESCRIPTOR, 0);
    }

    #[test]
    fn test_unsupported_method() {
        let mut bytes = descriptor_archive(b"abc", false);
        // claim bzip2 in the central record
        let cd_start = bytes.len() - END_OF_CENTRAL_DIR_LEN - CENTRAL_HEADER_LEN - 8;
        patch_u16(&mut bytes[cd_start..], CENTRAL_METHOD, 12);
        let container = ZipContainer::new(bytes).unwrap();
        assert!(matches!(
            container.data("data.txt"),
            Err(ZipError::UnsupportedCompression { method: 12, .. })
        ));
    }

    #[test]
    fn test_checksum_verification() {
        let mut bytes = descriptor_archive(b"abc", false);
        let cd_start = bytes.len() - END_OF_CENTRAL_DIR_LEN - CENTRAL_HEADER_LEN - 8;
        patch_u32(&mut bytes[cd_start..], CENTRAL_CRC, 0x1234_5678);

        let container = ZipContainer::new(bytes.clone()).unwrap();
        assert!(matches!(
            container.data("data.txt"),
            Err(ZipError::ChecksumMismatch { .. })
        ));
        let container = ZipContainer::new(bytes).unwrap().with_checksums(false);
        assert_eq!(container.data("data.txt").unwrap(), b"abc");
    }

    #[test]
    fn test_forged_uncompressed_size() {
        let mut container = ZipContainer::new(sample()).unwrap();
        let i = container.index["xl/workbook.xml"];
        container.entries[i].uncompressed_size = u32::MAX;
        assert!(matches!(
            container.data("xl/workbook.xml"),
            Err(ZipError::SizeMismatch { expected, actual, .. })
                if expected == u64::from(u32::MAX) && actual == 30
        ));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let first = descriptor_archive(b"first", false);
        let mut container = ZipContainer::new(first).unwrap();
        let mut second = container.entries[0].clone();
        second.replacement = Some(b"second".to_vec());
        second.uncompressed_size = 6;
        second.crc32 = crc32fast::hash(b"second");
        container.entries.push(second);
        container.index.insert("data.txt".into(), 1);
        assert_eq!(container.data("data.txt").unwrap(), b"second");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            ZipContainer::new(b"not a zip".to_vec()),
            Err(ZipError::InvalidArchive(_))
        ));
        assert!(matches!(
            ZipContainer::new(vec![0; 100]),
            Err(ZipError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_prefix_is_kept() {
        let mut bytes = b"#!stub\n".to_vec();
        let archive = descriptor_archive(b"abc", false);
        let shift = bytes.len() as u32;
        bytes.extend_from_slice(&archive);
        // shift the recorded offsets past the prefix
        let eocd = bytes.len() - END_OF_CENTRAL_DIR_LEN;
        let cd_start = eocd - CENTRAL_HEADER_LEN - 8;
        patch_u32(&mut bytes[cd_start..], CENTRAL_LOCAL_OFFSET, shift);
        let cd_offset = read_u32_at(&bytes, eocd + 16).unwrap();
        patch_u32(&mut bytes[eocd..], 16, cd_offset + shift);

        let container = ZipContainer::new(bytes.clone()).unwrap();
        assert_eq!(container.data("data.txt").unwrap(), b"abc");
        assert_eq!(container.save().unwrap(), bytes);
    }
}
