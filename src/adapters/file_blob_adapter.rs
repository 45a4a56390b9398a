//! Directory-backed blob store: one `<key>.json` file per key.

use crate::domain::error::JournalError;
use crate::ports::blob_port::BlobPort;
use crate::ports::config_port::ConfigPort;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileBlobAdapter {
    base_path: PathBuf,
}

impl FileBlobAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self::new(config.get_string_or(
            "file",
            "dir",
            crate::domain::config_validation::DEFAULT_DATA_DIR,
        ))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl BlobPort for FileBlobAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, JournalError> {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "blob read");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(JournalError::Storage {
                reason: format!("failed to read {}: {}", path.display(), e),
            }),
        }
    }

    /// Writes a temporary sibling, then renames it over the blob.
    fn put(&self, key: &str, value: &str) -> Result<(), JournalError> {
        fs::create_dir_all(&self.base_path).map_err(|e| JournalError::Storage {
            reason: format!("failed to create {}: {}", self.base_path.display(), e),
        })?;
        let path = self.blob_path(key);
        let tmp = self.base_path.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).map_err(|e| JournalError::Storage {
            reason: format!("failed to write {}: {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &path).map_err(|e| JournalError::Storage {
            reason: format!("failed to replace {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), bytes = value.len(), "blob written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let port = FileBlobAdapter::new(dir.path());
        assert_eq!(port.get("trades").unwrap(), None);
    }

    #[test]
    fn put_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("nested").join("journal");
        let port = FileBlobAdapter::new(&base);
        port.put("trades", "[]").unwrap();
        assert_eq!(fs::read_to_string(base.join("trades.json")).unwrap(), "[]");
        assert_eq!(port.get("trades").unwrap().as_deref(), Some("[]"));
        assert!(!base.join(".trades.json.tmp").exists());
    }

    #[test]
    fn put_replaces_content() {
        let dir = TempDir::new().unwrap();
        let port = FileBlobAdapter::new(dir.path());
        port.put("trades", "first").unwrap();
        port.put("trades", "second").unwrap();
        assert_eq!(port.get("trades").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn unreadable_path_is_storage_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("trades.json")).unwrap();
        let port = FileBlobAdapter::new(dir.path());
        assert!(matches!(port.get("trades"), Err(JournalError::Storage { .. })));
    }

    #[test]
    fn from_config_uses_dir_or_default() {
        let config = FileConfigAdapter::from_string("[file]\ndir = /data/journal\n").unwrap();
        assert_eq!(FileBlobAdapter::from_config(&config).base_path(), Path::new("/data/journal"));
        let port = FileBlobAdapter::from_config(&FileConfigAdapter::empty());
        assert_eq!(port.base_path(), Path::new(".tradejournal"));
    }
}
