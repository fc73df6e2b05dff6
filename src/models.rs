//
// models.rs
// Dicom-Png-rs
//
// Serializable response bodies shared by the CLI output and the HTTP API.
//
// Thales Matheus Mendonça Santos - November 2025

use serde::Serialize;

use crate::tag::TagKey;
use crate::values::HeaderValue;

/// A single header lookup; `value` is `null` when the element is present but empty.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderResponse {
    pub tag: TagKey,
    pub value: HeaderValue,
}

/// Plain `{ "message": ... }` body used for errors.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledges a stored upload or a generated PNG.
#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    pub message: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// Outcome of converting one file during a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub input: String,
    pub output: Option<String>,
    pub error: Option<String>,
}
