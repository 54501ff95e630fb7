//! Writing the decoded document to disk, and reading a saved one back
//!
//! The file is created or truncated and written in place. A crash mid-write can
//! leave a partial file behind.

use crate::error::{Result, ScrapeError};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// How the document is serialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Compact,
    Pretty,
}

/// Serialize `value` into `path`, replacing any existing file. Returns the number
/// of bytes written.
pub fn write_document(path: &Path, value: &Value, format: OutputFormat) -> Result<u64> {
    let bytes = match format {
        OutputFormat::Compact => serde_json::to_vec(value)?,
        OutputFormat::Pretty => serde_json::to_vec_pretty(value)?,
    };

    let io_err = |source: std::io::Error| ScrapeError::Io { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}

/// Read a previously saved document
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| ScrapeError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ScrapeError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_compact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let written = write_document(&path, &json!({"a": [1, 2]}), OutputFormat::Compact).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"{"a":[1,2]}"#);
        assert_eq!(written, content.len() as u64);
    }

    #[test]
    fn test_write_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        write_document(&path, &json!({"a": 1}), OutputFormat::Pretty).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "x".repeat(1024)).unwrap();

        write_document(&path, &json!([]), OutputFormat::Compact).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("data.json");

        let result = write_document(&path, &json!(null), OutputFormat::Compact);
        assert!(matches!(result, Err(ScrapeError::Io { path: p, .. }) if p == path));
    }

    #[test]
    fn test_read_back_written_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        write_document(&path, &json!([{"grade": "A"}]), OutputFormat::Pretty).unwrap();

        assert_eq!(read_document(&path).unwrap(), json!([{"grade": "A"}]));
    }

    #[test]
    fn test_read_missing_and_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_document(&missing), Err(ScrapeError::ReadFailed { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[1,").unwrap();
        assert!(matches!(read_document(&broken), Err(ScrapeError::InvalidDocument { path, .. }) if path == broken));
    }
}
