//
// values.rs
// Dicom-Png-rs
//
// Decodes element values from the directory using a fixed string, uint16, uint32 fallback order.
//
// Thales Matheus Mendonça Santos - November 2025

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::warn;

use crate::directory::{self, DirectoryEntry, ElementDirectory, ValueRepresentation};
use crate::error::Result;
use crate::tag::TagKey;

/// A decoded element value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    Text(String),
    U16(u16),
    U32(u32),
}

/// Outcome of looking up one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// The tag is not in the file.
    Absent,
    /// The tag is present but its value is empty or could not be decoded.
    Unset,
    Present(DecodedValue),
}

impl HeaderValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, HeaderValue::Absent)
    }
}

impl Serialize for HeaderValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            HeaderValue::Absent | HeaderValue::Unset => serializer.serialize_none(),
            HeaderValue::Present(DecodedValue::Text(s)) => serializer.serialize_str(s),
            HeaderValue::Present(DecodedValue::U16(v)) => serializer.serialize_u16(*v),
            HeaderValue::Present(DecodedValue::U32(v)) => serializer.serialize_u32(*v),
        }
    }
}

/// Every header of a file, in file order. Serializes as a JSON object keyed by tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap(Vec<(TagKey, HeaderValue)>);

impl HeaderMap {
    pub fn get(&self, tag: TagKey) -> Option<&HeaderValue> {
        self.0.iter().find(|(t, _)| *t == tag).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TagKey, HeaderValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (tag, value) in &self.0 {
            map.serialize_entry(tag, value)?;
        }
        map.end()
    }
}

type Decoder = fn(&DirectoryEntry, &[u8]) -> Option<DecodedValue>;

// Tried in order; the first decoder that accepts the bytes wins.
const DECODE_ORDER: [Decoder; 3] = [decode_text, decode_u16, decode_u32];

/// Looks up `tag` in the directory and decodes its value.
pub fn extract_by_tag(directory: &ElementDirectory, buffer: &[u8], tag: TagKey) -> HeaderValue {
    match directory.get(tag) {
        Some(entry) => decode_entry(entry, buffer),
        None => HeaderValue::Absent,
    }
}

/// Decodes every entry of the directory. Undecodable entries come back as `Unset`.
pub fn extract_all(directory: &ElementDirectory, buffer: &[u8]) -> HeaderMap {
    HeaderMap(
        directory
            .iter()
            .map(|entry| (entry.tag, decode_entry(entry, buffer)))
            .collect(),
    )
}

/// Parses `buffer` and decodes every header. A buffer that fails to parse yields an empty map.
pub fn extract_all_from_bytes(buffer: &[u8]) -> HeaderMap {
    match directory::parse(buffer) {
        Ok(directory) => extract_all(&directory, buffer),
        Err(err) => {
            warn!(error = %err, "could not parse DICOM headers");
            HeaderMap::default()
        }
    }
}

/// Parses `buffer` and looks up a single tag.
pub fn extract_from_bytes(buffer: &[u8], tag: TagKey) -> Result<HeaderValue> {
    let directory = directory::parse(buffer)?;
    Ok(extract_by_tag(&directory, buffer, tag))
}

fn decode_entry(entry: &DirectoryEntry, buffer: &[u8]) -> HeaderValue {
    // Sequences and encapsulated pixel data hold items, not a scalar value.
    if entry.undefined_length || &entry.vr_code == b"SQ" {
        return HeaderValue::Unset;
    }
    let Some(bytes) = entry.value_bytes(buffer) else {
        return HeaderValue::Unset;
    };
    if bytes.is_empty() {
        return HeaderValue::Unset;
    }
    DECODE_ORDER
        .iter()
        .find_map(|decode| decode(entry, bytes))
        .map_or(HeaderValue::Unset, HeaderValue::Present)
}

/// Reads the value as padded text, ignoring anything after the first NUL.
pub fn read_string(entry: &DirectoryEntry, buffer: &[u8]) -> Option<String> {
    let bytes = entry.value_bytes(buffer)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = std::str::from_utf8(&bytes[..end]).ok()?;
    Some(text.trim_matches(' ').to_string())
}

/// Reads the first little endian `u16` of the value.
pub fn read_u16(entry: &DirectoryEntry, buffer: &[u8]) -> Option<u16> {
    let bytes = entry.value_bytes(buffer)?;
    Some(u16::from_le_bytes([*bytes.first()?, *bytes.get(1)?]))
}

/// Reads the first little endian `u32` of the value.
pub fn read_u32(entry: &DirectoryEntry, buffer: &[u8]) -> Option<u32> {
    let bytes = entry.value_bytes(buffer)?;
    let head: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(head))
}

fn decode_text(_entry: &DirectoryEntry, bytes: &[u8]) -> Option<DecodedValue> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = std::str::from_utf8(&bytes[..end]).ok()?.trim_matches(' ');
    let printable = text
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r' | '\x0c' | '\x1b'));
    (!text.is_empty() && printable).then(|| DecodedValue::Text(text.to_string()))
}

/// A lone 2-byte value, or the first value of a multi-valued `US` element.
fn decode_u16(entry: &DirectoryEntry, bytes: &[u8]) -> Option<DecodedValue> {
    match bytes {
        [lo, hi] => Some(DecodedValue::U16(u16::from_le_bytes([*lo, *hi]))),
        [lo, hi, ..] if entry.vr == ValueRepresentation::Uint16 => {
            Some(DecodedValue::U16(u16::from_le_bytes([*lo, *hi])))
        }
        _ => None,
    }
}

fn decode_u32(_entry: &DirectoryEntry, bytes: &[u8]) -> Option<DecodedValue> {
    let head: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(DecodedValue::U32(u32::from_le_bytes(head)))
}
