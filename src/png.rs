//
// png.rs
// Dicom-Png-rs
//
// Minimal PNG writer: signature, IHDR, zlib-compressed IDAT chunks and IEND for 8-bit RGBA rasters.
//
// Thales Matheus Mendonça Santos - November 2025

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};

use crate::error::{DicomError, Result};

/// Magic number at the start of every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const COLOR_TYPE_RGBA: u8 = 6;
const BIT_DEPTH: u8 = 8;
const FILTER_NONE: u8 = 0;
const MAX_IDAT_LEN: usize = 64 * 1024;

/// 8-bit RGBA pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub const CHANNELS: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_raster(format!(
                "raster dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(Self::CHANNELS))
            .ok_or_else(|| invalid_raster(format!("raster {width}x{height} is too large")))?;
        if pixels.len() != expected {
            return Err(invalid_raster(format!(
                "raster {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Opaque grayscale expressed as RGBA: R = G = B = intensity, A = 255.
    pub fn from_gray(width: u32, height: u32, intensities: &[u8]) -> Result<Self> {
        let pixels = intensities
            .iter()
            .flat_map(|&v| [v, v, v, u8::MAX])
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn stride(&self) -> usize {
        self.width as usize * Self::CHANNELS
    }
}

/// Encodes the raster into a complete PNG byte stream.
pub fn encode(raster: Raster) -> Result<Vec<u8>> {
    let mut header = Vec::with_capacity(13);
    header.extend_from_slice(&raster.width.to_be_bytes());
    header.extend_from_slice(&raster.height.to_be_bytes());
    // bit depth, color type, compression, filter method, interlace
    header.extend_from_slice(&[BIT_DEPTH, COLOR_TYPE_RGBA, 0, 0, 0]);

    let compressed = compress_scanlines(&raster)?;

    let mut out = Vec::with_capacity(compressed.len() + 64);
    out.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut out, b"IHDR", &header);
    for part in compressed.chunks(MAX_IDAT_LEN) {
        write_chunk(&mut out, b"IDAT", part);
    }
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

/// True when the buffer starts with the PNG signature.
pub fn is_png(buffer: &[u8]) -> bool {
    buffer.starts_with(&PNG_SIGNATURE)
}

fn compress_scanlines(raster: &Raster) -> io::Result<Vec<u8>> {
    let stride = raster.stride();
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(raster.pixels.len() / 2),
        Compression::default(),
    );
    for row in raster.pixels.chunks_exact(stride) {
        encoder.write_all(&[FILTER_NONE])?;
        encoder.write_all(row)?;
    }
    encoder.finish()
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(data);

    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}

fn invalid_raster(message: String) -> DicomError {
    DicomError::Png(io::Error::new(io::ErrorKind::InvalidInput, message))
}
