//
// lib.rs
// Dicom-Png-rs
//
// Exposes the crate's modules and re-exports the CLI entry point for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Parsing and conversion core, leaves first.
pub mod error;
pub mod tag;
pub mod directory;
pub mod values;
pub mod pixels;
pub mod normalize;
pub mod png;
pub mod image;

// Collaborators and command surface.
pub mod batch;
pub mod cli;
pub mod dump;
pub mod models;
pub mod storage;
pub mod web;

#[cfg(test)]
mod fixtures;

pub use cli::{run as run_cli, Cli, Commands};
pub use error::DicomError;
pub use image::dicom_to_png;
pub use values::{DecodedValue, HeaderValue};
