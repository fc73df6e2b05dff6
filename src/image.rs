//
// image.rs
// Dicom-Png-rs
//
// Converts DICOM bytes into PNG bytes: directory, pixel plane, normalization, raster, encoder.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::directory;
use crate::error::{DicomError, Result};
use crate::normalize::normalize_samples;
use crate::pixels::{self, PixelPlane};
use crate::png::{self, Raster};

/// Renders the pixel data of a DICOM buffer as a PNG. Either the whole PNG or an error comes back.
pub fn dicom_to_png(dicom: &[u8]) -> Result<Vec<u8>> {
    let directory = directory::parse(dicom)?;
    let plane = pixels::locate(&directory, dicom)?;
    let raster = grayscale_raster(&plane)?;
    png::encode(raster)
}

/// Builds the opaque grayscale raster for the first `rows * columns` samples of the plane.
pub fn grayscale_raster(plane: &PixelPlane<'_>) -> Result<Raster> {
    let width = u32::from(plane.columns);
    let height = u32::from(plane.rows);
    let pixel_count = width as usize * height as usize;

    if pixel_count == 0 {
        return Err(DicomError::Malformed(format!(
            "image dimensions are {}x{} (rows x columns)",
            plane.rows, plane.columns
        )));
    }
    if plane.sample_count() < pixel_count {
        return Err(DicomError::Malformed(format!(
            "pixel data holds {} samples but {}x{} needs {pixel_count}",
            plane.sample_count(),
            plane.rows,
            plane.columns
        )));
    }

    let samples: Vec<u16> = plane.samples().take(pixel_count).collect();
    let intensities = normalize_samples(&samples);
    debug!(width, height, samples = samples.len(), "normalized pixel plane");

    Raster::from_gray(width, height, &intensities)
}

/// Reads a DICOM file, converts it and writes the PNG next to it (or to `output`).
pub fn convert(input: &Path, output: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let png = dicom_to_png(&bytes).with_context(|| format!("Failed to convert {:?}", input))?;

    let output = output.unwrap_or_else(|| input.with_extension("png"));
    fs::write(&output, png).with_context(|| format!("Failed to save image to {:?}", output))?;
    Ok(output)
}
