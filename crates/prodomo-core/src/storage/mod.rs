//! Document persistence.
//!
//! Every persisted record (users, tasks, statistics) is a whole JSON
//! document that is loaded and rewritten as a unit. Corrupt or missing
//! documents fall back to their default instead of failing the process;
//! writes go through a temp file + rename so a crash mid-write never
//! leaves a torn document. Last writer wins - concurrent multi-process
//! access is not supported.

mod config;

pub use config::Config;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Returns `~/.config/prodomo[-dev]/` based on PRODOMO_ENV.
///
/// Set PRODOMO_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PRODOMO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("prodomo-dev")
    } else {
        base_dir.join("prodomo")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Read a JSON document, falling back to `T::default()` when the file is
/// missing or does not parse.
pub(crate) fn read_document<T>(path: &Path) -> T
where
    T: Default + DeserializeOwned,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return T::default(),
    };
    match serde_json::from_str(&content) {
        Ok(doc) => doc,
        Err(err) => {
            log::warn!("discarding unreadable document {}: {err}", path.display());
            T::default()
        }
    }
}

/// Whole-document rewrite via temp file + rename.
pub(crate) fn write_document<T>(path: &Path, doc: &T) -> Result<(), StorageError>
where
    T: Serialize,
{
    let content =
        serde_json::to_string_pretty(doc).map_err(|source| StorageError::EncodeFailed {
            path: path.to_path_buf(),
            source,
        })?;
    let tmp = path.with_extension("json.tmp");
    let write = std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, path));
    write.map_err(|source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_document_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let doc: BTreeMap<String, u32> = read_document(&dir.path().join("absent.json"));
        assert!(doc.is_empty());
    }

    #[test]
    fn corrupt_document_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let doc: BTreeMap<String, u32> = read_document(&path);
        assert!(doc.is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("alice".to_string(), 3u32);
        write_document(&path, &doc).unwrap();
        let back: BTreeMap<String, u32> = read_document(&path);
        assert_eq!(back, doc);
        // No temp file left behind.
        assert!(!path.with_extension("json.tmp").exists());
    }
}
