//
// tag.rs
// Dicom-Png-rs
//
// Converts DICOM tags between their (group, element) wire form and the textual `x` + 8 hex digits key.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{DicomError, Result};

/// Canonical key of a DICOM attribute, rendered as `x` followed by 8 uppercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagKey(u32);

impl TagKey {
    pub const ROWS: TagKey = TagKey::from_parts(0x0028, 0x0010);
    pub const COLUMNS: TagKey = TagKey::from_parts(0x0028, 0x0011);
    pub const PIXEL_DATA: TagKey = TagKey::from_parts(0x7FE0, 0x0010);
    pub const TRANSFER_SYNTAX_UID: TagKey = TagKey::from_parts(0x0002, 0x0010);

    pub const fn from_parts(group: u16, element: u16) -> Self {
        TagKey(((group as u32) << 16) | element as u32)
    }

    pub const fn group(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn element(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{:08X}", self.0)
    }
}

impl FromStr for TagKey {
    type Err = DicomError;

    fn from_str(s: &str) -> Result<Self> {
        normalize(Some(s))
    }
}

impl Serialize for TagKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalizes a caller-supplied tag string into a [`TagKey`].
///
/// Whitespace is trimmed, then a leading `0x` is removed, then a single leading `x`.
/// What remains must be exactly 8 hexadecimal digits.
pub fn normalize(raw: Option<&str>) -> Result<TagKey> {
    let raw = raw.ok_or_else(|| DicomError::InvalidTag(String::new()))?;
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let digits = digits.strip_prefix('x').unwrap_or(digits);

    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DicomError::InvalidTag(raw.to_string()));
    }

    u32::from_str_radix(digits, 16)
        .map(TagKey)
        .map_err(|_| DicomError::InvalidTag(raw.to_string()))
}
