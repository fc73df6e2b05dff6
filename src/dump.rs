//
// dump.rs
// Dicom-Png-rs
//
// Renders a human-readable listing of every top-level element with a truncated value preview.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::directory::{self, DirectoryEntry, ValueRepresentation};
use crate::values::{self, DecodedValue, HeaderValue};

/// Print a textual dump of all elements in the file.
pub fn dump_file(path: &Path, max_value_len: usize) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let output = dump_to_string(&bytes, max_value_len)?;
    print!("{output}");
    Ok(())
}

pub fn dump_to_string(buffer: &[u8], max_value_len: usize) -> Result<String> {
    let directory = directory::parse(buffer).context("Failed to parse DICOM file")?;
    let mut out = String::new();
    for entry in directory.iter() {
        let value = values::extract_by_tag(&directory, buffer, entry.tag);
        let _ = writeln!(
            out,
            "{} {} {}",
            format_tag(entry),
            entry.vr_str(),
            preview(entry, &value, max_value_len)
        );
    }
    Ok(out)
}

fn preview(entry: &DirectoryEntry, value: &HeaderValue, max_value_len: usize) -> String {
    if entry.undefined_length {
        // Sequences and encapsulated pixel data are summarized to avoid massive output.
        return format!("[undefined length: {} bytes]", entry.length);
    }
    if entry.vr == ValueRepresentation::Other {
        return format!("{} bytes", entry.length);
    }
    match value {
        HeaderValue::Present(DecodedValue::Text(text)) => truncate(text, max_value_len),
        HeaderValue::Present(DecodedValue::U16(v)) => v.to_string(),
        HeaderValue::Present(DecodedValue::U32(v)) => v.to_string(),
        HeaderValue::Absent | HeaderValue::Unset => format!("{} bytes", entry.length),
    }
}

fn truncate(input: &str, limit: usize) -> String {
    match input.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}…", &input[..cut]),
        None => input.to_string(),
    }
}

fn format_tag(entry: &DirectoryEntry) -> String {
    format!("({:04X},{:04X})", entry.tag.group(), entry.tag.element())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DicomBuilder;

    #[test]
    fn lists_each_element_on_its_own_line() {
        let bytes = DicomBuilder::new()
            .string(0x0010, 0x0010, b"PN", "Doe^Jane")
            .u16(0x0028, 0x0010, 512)
            .pixels(&[0, 1])
            .build();

        let dump = dump_to_string(&bytes, 64).unwrap();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(
            lines,
            [
                "(0010,0010) PN Doe^Jane",
                "(0028,0010) US 512",
                "(7FE0,0010) OW 4 bytes",
            ]
        );
    }

    #[test]
    fn long_values_are_truncated() {
        let bytes = DicomBuilder::new()
            .string(0x0008, 0x1030, b"LO", "ABDOMEN PELVIS WITH CONTRAST")
            .build();
        let dump = dump_to_string(&bytes, 7).unwrap();
        assert_eq!(dump.trim_end(), "(0008,1030) LO ABDOMEN…");
    }

    #[test]
    fn corrupt_files_report_an_error() {
        assert!(dump_to_string(b"short", 64).is_err());
    }
}
