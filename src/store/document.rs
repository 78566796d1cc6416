//! JSON document persistence
//!
//! Missing documents are created with a default body; documents that do
//! not parse are overwritten with the default rather than repaired.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from reading or writing a document
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_owned(),
        source,
    }
}

/// Load a document, writing `default` first if it is missing or corrupt
pub fn load_document<T>(path: &Path, default: T) -> Result<T, StorageError>
where
    T: Serialize + DeserializeOwned,
{
    if !path.exists() {
        debug!(?path, "document missing, writing default");
        save_document(path, &default)?;
        return Ok(default);
    }

    let raw = fs::read_to_string(path).map_err(io_error(path))?;
    match serde_json::from_str(&raw) {
        Ok(document) => Ok(document),
        Err(e) => {
            warn!(?path, error = %e, "corrupt document replaced with default");
            save_document(path, &default)?;
            Ok(default)
        }
    }
}

/// Write a document as pretty JSON, creating parent directories
pub fn save_document<T: Serialize>(path: &Path, document: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let encoded = serde_json::to_string_pretty(document).map_err(|source| StorageError::Encode {
        path: path.to_owned(),
        source,
    })?;
    fs::write(path, encoded).map_err(io_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/prefs.json");

        let loaded: Value = load_document(&path, json!({ "name": "ERROR" })).unwrap();
        assert_eq!(loaded, json!({ "name": "ERROR" }));

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, json!({ "name": "ERROR" }));
    }

    #[test]
    fn test_corrupt_document_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("context.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded: Value = load_document(&path, json!({ "history": [] })).unwrap();
        assert_eq!(loaded, json!({ "history": [] }));
        assert!(fs::read_to_string(&path).unwrap().contains("history"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let document = json!({ "name": "ERROR", "preferences": { "voice": "calm", "volume": 7 } });

        save_document(&path, &document).unwrap();
        let loaded: Value = load_document(&path, json!({})).unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn test_unwritable_location_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = save_document(&blocker.join("doc.json"), &json!({})).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
