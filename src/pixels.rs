//
// pixels.rs
// Dicom-Png-rs
//
// Locates the Pixel Data element and exposes it as a borrowed grid of 16-bit samples.
//
// Thales Matheus Mendonça Santos - November 2025

use crate::directory::ElementDirectory;
use crate::error::{DicomError, Result};
use crate::tag::TagKey;
use crate::values;

/// Unsigned 16-bit samples viewed in place inside the source buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelPlane<'a> {
    pub rows: u16,
    pub columns: u16,
    bytes: &'a [u8],
}

impl<'a> PixelPlane<'a> {
    /// Number of complete little endian samples; a trailing odd byte is ignored.
    pub fn sample_count(&self) -> usize {
        self.bytes.len() / 2
    }

    pub fn samples(&self) -> impl Iterator<Item = u16> + 'a {
        let bytes: &'a [u8] = self.bytes;
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }
}

/// Finds Pixel Data together with Rows and Columns. Missing dimensions read as 0.
pub fn locate<'a>(directory: &ElementDirectory, buffer: &'a [u8]) -> Result<PixelPlane<'a>> {
    let entry = directory
        .get(TagKey::PIXEL_DATA)
        .ok_or(DicomError::NoPixelData)?;

    if entry.undefined_length {
        return Err(DicomError::UnsupportedPixelData(
            "encapsulated (compressed) pixel data".into(),
        ));
    }

    let bytes = entry.value_bytes(buffer).ok_or_else(|| {
        DicomError::Malformed("pixel data lies outside the buffer".into())
    })?;

    let dimension = |tag| {
        directory
            .get(tag)
            .and_then(|e| values::read_u16(e, buffer))
            .unwrap_or(0)
    };

    Ok(PixelPlane {
        rows: dimension(TagKey::ROWS),
        columns: dimension(TagKey::COLUMNS),
        bytes,
    })
}
