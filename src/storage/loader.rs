//! Dataset acquisition
//!
//! Reads a candidate dataset from disk (or stdin) into an untyped JSON value.
//! Nothing here validates; that is the load gate's job.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Source encoding of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Picks the format from the file extension; anything unknown is JSON
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

/// Whether `path` means standard input
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Reads and parses a dataset candidate; `-` reads stdin as JSON
pub fn acquire(path: &Path) -> Result<Value, AcquisitionError> {
    let content = if is_stdin(path) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| AcquisitionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| AcquisitionError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };

    parse(path, &content, SourceFormat::for_path(path))
}

/// Parses already-read content
pub fn parse(path: &Path, content: &str, format: SourceFormat) -> Result<Value, AcquisitionError> {
    let parsed: Result<Value, String> = match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };

    let value = parsed.map_err(|message| AcquisitionError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::debug!(path = %path.display(), ?format, "dataset acquired");
    Ok(value)
}
