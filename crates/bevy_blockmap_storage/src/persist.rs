//! Reading and writing JSON documents on disk.

use std::fs;
use std::path::Path;

use bevy::prelude::*;

use crate::StorageError;

/// A generic parsed storage document.
pub type Document = serde_json::Value;

/// Result of writing a document back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The target does not exist or is not a regular file; nothing was written
    Skipped,
}

/// Read and parse the document at `path`.
///
/// Returns `Ok(None)` when there is no regular file at `path`.
pub fn read_document(path: &Path) -> Result<Option<Document>, StorageError> {
    if !path.is_file() {
        return Ok(None);
    }

    let text = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&text).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Read document {}", path.display());
    Ok(Some(document))
}

/// Overwrite the document at `path` with compact JSON.
///
/// Only existing regular files are overwritten. Any other target is skipped with a
/// warning, so a document whose file was removed is never recreated.
pub fn write_document(path: &Path, document: &Document) -> Result<WriteOutcome, StorageError> {
    if !path.is_file() {
        warn!(
            "Not saving document: {} is missing or not a regular file",
            path.display()
        );
        return Ok(WriteOutcome::Skipped);
    }

    let text = serde_json::to_string(document).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(WriteOutcome::Written)
}
