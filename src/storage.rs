//
// storage.rs
// Dicom-Png-rs
//
// File-access collaborator: reads and writes named files under an explicit storage root.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        // Create the storage directory eagerly so subsequent saves do not fail at runtime.
        fs::create_dir_all(&root).context("Failed to create storage directory")?;
        Ok(Self { root })
    }

    /// Reads a stored file. `Ok(None)` means there is no such file under the root.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {:?}", path)),
        }
    }

    /// Writes `bytes` under the sanitized form of `name` and returns the stored name.
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let filename = sanitize_filename(name);
        if filename.is_empty() || filename.chars().all(|c| c == '.') {
            bail!("Invalid file name {:?}", name);
        }
        let path = self.root.join(&filename);
        fs::write(&path, bytes).context("Failed to persist file")?;
        Ok(filename)
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let canonical_root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());
        let canonical = self.root.join(name).canonicalize().ok()?;
        // Guard against path traversal by enforcing the canonical root prefix.
        canonical.starts_with(&canonical_root).then_some(canonical)
    }
}

/// Spaces become underscores; anything outside `[A-Za-z0-9-_.]` is dropped.
pub fn sanitize_filename(input: &str) -> String {
    input
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

/// The file stem with a `.png` extension.
pub fn png_file_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    format!("{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sanitize_strips_dangerous_characters() {
        assert_eq!(sanitize_filename("../weird name 123.dcm"), "..weird_name_123.dcm");
        assert_eq!(sanitize_filename("IM000001"), "IM000001");
        assert_eq!(sanitize_filename("a/b\\c$d.png"), "abcd.png");
    }

    #[test]
    fn png_names_replace_the_extension() {
        assert_eq!(png_file_name("IM000001.dcm"), "IM000001.png");
        assert_eq!(png_file_name("IM000001"), "IM000001.png");
        assert_eq!(png_file_name("archive.tar.dcm"), "archive.tar.png");
    }

    #[test]
    fn write_then_read_round_trips() {
        let root = tempdir().expect("tmpdir");
        let store = FileStore::new(root.path().join("assets")).expect("store");

        let name = store.write("test file.dcm", b"abc").expect("write");
        assert_eq!(name, "test_file.dcm");
        assert_eq!(store.read(&name).unwrap().as_deref(), Some(b"abc".as_slice()));
        assert_eq!(store.read("missing.dcm").unwrap(), None);
    }

    #[test]
    fn read_refuses_paths_outside_root() {
        let root = tempdir().expect("tmpdir");
        let store_root = root.path().join("safe-area");
        let store = FileStore::new(&store_root).expect("store");

        fs::write(root.path().join("escape.dcm"), b"attack").expect("write outside file");
        assert_eq!(store.read("../escape.dcm").unwrap(), None);
        assert!(store.write("..", b"x").is_err());
    }
}
