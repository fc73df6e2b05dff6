//
// directory.rs
// Dicom-Png-rs
//
// Walks an explicit VR little endian byte stream once and indexes every top-level element by tag.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DicomError, Result};
use crate::tag::TagKey;
use crate::values;

/// Length of the Part 10 preamble that precedes the `DICM` signature.
pub const PREAMBLE_LEN: usize = 128;
/// Offset of the first element header (preamble plus signature).
pub const DATA_SET_START: usize = PREAMBLE_LEN + 4;

const SIGNATURE: &[u8; 4] = b"DICM";
const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;
const MAX_SEQUENCE_DEPTH: usize = 64;

const ITEM: (u16, u16) = (0xFFFE, 0xE000);
const ITEM_DELIMITATION: (u16, u16) = (0xFFFE, 0xE00D);
const SEQUENCE_DELIMITATION: (u16, u16) = (0xFFFE, 0xE0DD);

/// Coarse value representation classes the extractor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRepresentation {
    String,
    Uint16,
    Uint32,
    Other,
}

impl ValueRepresentation {
    fn classify(code: [u8; 2]) -> Self {
        match &code {
            b"AE" | b"AS" | b"CS" | b"DA" | b"DS" | b"DT" | b"IS" | b"LO" | b"LT" | b"PN"
            | b"SH" | b"ST" | b"TM" | b"UC" | b"UI" | b"UR" | b"UT" => Self::String,
            b"US" => Self::Uint16,
            b"UL" => Self::Uint32,
            _ => Self::Other,
        }
    }
}

/// Location of one element's value bytes inside the parsed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub tag: TagKey,
    pub vr: ValueRepresentation,
    pub vr_code: [u8; 2],
    pub offset: usize,
    pub length: usize,
    /// The element was encoded with undefined length (sequence or encapsulated pixel data).
    pub undefined_length: bool,
}

impl DirectoryEntry {
    pub fn vr_str(&self) -> &str {
        std::str::from_utf8(&self.vr_code).unwrap_or("??")
    }

    /// Borrow the value bytes from the buffer the directory was built from.
    pub fn value_bytes<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(self.length)?;
        buffer.get(self.offset..end)
    }
}

/// Tag-indexed view over every top-level element of one file, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct ElementDirectory {
    entries: Vec<DirectoryEntry>,
    index: HashMap<TagKey, usize>,
}

impl ElementDirectory {
    pub fn get(&self, tag: TagKey) -> Option<&DirectoryEntry> {
        self.index.get(&tag).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, tag: TagKey) -> bool {
        self.index.contains_key(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: DirectoryEntry) {
        // A repeated tag keeps its first position but points at the latest value.
        match self.index.get(&entry.tag) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.tag, self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

/// True when bytes 128..132 hold the `DICM` signature.
pub fn has_dicom_signature(buffer: &[u8]) -> bool {
    buffer.get(PREAMBLE_LEN..DATA_SET_START) == Some(SIGNATURE.as_slice())
}

/// Builds the element directory of a Part 10 buffer without copying any value bytes.
pub fn parse(buffer: &[u8]) -> Result<ElementDirectory> {
    if buffer.len() < DATA_SET_START {
        return Err(DicomError::Malformed(format!(
            "buffer of {} bytes is shorter than the {}-byte preamble and signature",
            buffer.len(),
            DATA_SET_START
        )));
    }
    if !has_dicom_signature(buffer) {
        return Err(DicomError::NotDicom);
    }

    let mut reader = ByteReader::new(buffer, DATA_SET_START);
    let mut directory = ElementDirectory::default();
    let mut meta_checked = false;

    while !reader.at_end() {
        // The transfer syntax only becomes known once the 0002 group has been read.
        if !meta_checked && reader.peek_u16()? != 0x0002 {
            check_transfer_syntax(&directory, buffer)?;
            meta_checked = true;
        }
        let entry = read_element(&mut reader, 0)?;
        directory.insert(entry);
    }

    debug!(elements = directory.len(), "parsed element directory");
    Ok(directory)
}

fn check_transfer_syntax(directory: &ElementDirectory, buffer: &[u8]) -> Result<()> {
    let Some(entry) = directory.get(TagKey::TRANSFER_SYNTAX_UID) else {
        return Ok(());
    };
    let Some(uid) = values::read_string(entry, buffer) else {
        return Ok(());
    };

    let unsupported = match uid.as_str() {
        "1.2.840.10008.1.2" => "implicit VR little endian",
        "1.2.840.10008.1.2.2" => "explicit VR big endian",
        "1.2.840.10008.1.2.1.99" => "deflated explicit VR little endian",
        _ => return Ok(()),
    };
    Err(DicomError::UnsupportedTransferSyntax(format!(
        "{uid} ({unsupported})"
    )))
}

fn read_element(reader: &mut ByteReader<'_>, depth: usize) -> Result<DirectoryEntry> {
    let start = reader.pos;
    let group = reader.u16()?;
    let element = reader.u16()?;
    let tag = TagKey::from_parts(group, element);

    let code = reader.take(2)?;
    let vr_code = [code[0], code[1]];
    if !vr_code.iter().all(u8::is_ascii_uppercase) {
        return Err(DicomError::Malformed(format!(
            "invalid value representation {:02X}{:02X} for {tag} at offset {start}",
            vr_code[0], vr_code[1]
        )));
    }

    let length = if has_long_length(vr_code) {
        reader.skip(2)?;
        reader.u32()?
    } else {
        u32::from(reader.u16()?)
    };

    let offset = reader.pos;
    let vr = ValueRepresentation::classify(vr_code);

    if length == UNDEFINED_LENGTH {
        let end = skip_undefined_length(reader, depth + 1)?;
        return Ok(DirectoryEntry {
            tag,
            vr,
            vr_code,
            offset,
            length: end - offset,
            undefined_length: true,
        });
    }

    let length = length as usize;
    if reader.remaining() < length {
        return Err(DicomError::Malformed(format!(
            "{tag} at offset {start} declares {length} value bytes but only {} remain",
            reader.remaining()
        )));
    }
    reader.skip(length)?;

    Ok(DirectoryEntry {
        tag,
        vr,
        vr_code,
        offset,
        length,
        undefined_length: false,
    })
}

/// Skips the items of an undefined-length element and returns the offset of its delimiter.
fn skip_undefined_length(reader: &mut ByteReader<'_>, depth: usize) -> Result<usize> {
    if depth > MAX_SEQUENCE_DEPTH {
        return Err(DicomError::Malformed("sequence nesting too deep".into()));
    }

    loop {
        let item_start = reader.pos;
        let tag = (reader.u16()?, reader.u16()?);
        let length = reader.u32()?;

        match tag {
            SEQUENCE_DELIMITATION => return Ok(item_start),
            ITEM if length == UNDEFINED_LENGTH => skip_item_data_set(reader, depth)?,
            ITEM => {
                let length = length as usize;
                if reader.remaining() < length {
                    return Err(DicomError::Malformed(format!(
                        "item at offset {item_start} declares {length} bytes but only {} remain",
                        reader.remaining()
                    )));
                }
                reader.skip(length)?;
            }
            (group, element) => {
                return Err(DicomError::Malformed(format!(
                    "unexpected {} at offset {item_start} inside undefined-length element",
                    TagKey::from_parts(group, element)
                )))
            }
        }
    }
}

fn skip_item_data_set(reader: &mut ByteReader<'_>, depth: usize) -> Result<()> {
    loop {
        if reader.peek_tag()? == ITEM_DELIMITATION {
            reader.skip(8)?;
            return Ok(());
        }
        read_element(reader, depth)?;
    }
}

fn has_long_length(code: [u8; 2]) -> bool {
    matches!(
        &code,
        b"OB" | b"OD" | b"OF" | b"OL" | b"OV" | b"OW" | b"SQ" | b"SV" | b"UC" | b"UN" | b"UR"
            | b"UT" | b"UV"
    )
}

/// Bounds-checked little endian cursor.
struct ByteReader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buffer: &'a [u8], pos: usize) -> Self {
        Self { buffer, pos }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.buffer.len()
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let buffer = self.buffer;
        let bytes = self
            .pos
            .checked_add(n)
            .and_then(|end| buffer.get(self.pos..end))
            .ok_or_else(|| {
                DicomError::Malformed(format!(
                    "unexpected end of data at offset {} (needed {n} bytes, {} remain)",
                    self.pos,
                    self.remaining()
                ))
            })?;
        self.pos += n;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn peek_u16(&self) -> Result<u16> {
        let mut probe = ByteReader::new(self.buffer, self.pos);
        probe.u16()
    }

    fn peek_tag(&self) -> Result<(u16, u16)> {
        let mut probe = ByteReader::new(self.buffer, self.pos);
        Ok((probe.u16()?, probe.u16()?))
    }
}
