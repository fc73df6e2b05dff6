//
// error.rs
// Dicom-Png-rs
//
// Failure kinds surfaced by the parsing and conversion core.
//
// Thales Matheus Mendonça Santos - November 2025

use thiserror::Error;

/// Errors raised by the tag codec, the element directory parser and the PNG pipeline.
///
/// Lookup outcomes (tag absent, value empty) are not errors; see [`crate::values::HeaderValue`].
#[derive(Debug, Error)]
pub enum DicomError {
    #[error("invalid tag {0:?}: expected 8 hexadecimal digits")]
    InvalidTag(String),
    #[error("file is not a DICOM file (missing DICM signature)")]
    NotDicom,
    #[error("malformed DICOM: {0}")]
    Malformed(String),
    #[error("No pixel data found in the DICOM file.")]
    NoPixelData,
    #[error("unsupported transfer syntax: {0}")]
    UnsupportedTransferSyntax(String),
    #[error("unsupported pixel data: {0}")]
    UnsupportedPixelData(String),
    #[error("failed to encode PNG: {0}")]
    Png(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DicomError>;
