//
// batch.rs
// Dicom-Png-rs
//
// Converts every .dcm file under a directory to PNG in parallel.
//
// Thales Matheus Mendonça Santos - November 2025

use anyhow::Result;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::image;
use crate::models::BatchOutcome;

pub fn process_directory(dir: &Path) -> Result<Vec<BatchOutcome>> {
    info!(directory = ?dir, "converting directory");

    let files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("dcm"))
        })
        .collect();

    info!(count = files.len(), "found DICOM files");

    // Each conversion owns its buffers, so files can be processed independently.
    let outcomes = files
        .par_iter()
        .map(|entry| {
            let path = entry.path();
            let input = path.display().to_string();
            match image::convert(path, None) {
                Ok(output) => BatchOutcome {
                    input,
                    output: Some(output.display().to_string()),
                    error: None,
                },
                Err(e) => {
                    warn!(file = %input, error = %format!("{e:#}"), "conversion failed");
                    BatchOutcome {
                        input,
                        output: None,
                        error: Some(format!("{e:#}")),
                    }
                }
            }
        })
        .collect();

    Ok(outcomes)
}
