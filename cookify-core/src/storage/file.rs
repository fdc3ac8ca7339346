//! File-backed key-value storage: one JSON file per key.

use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use super::{KeyValueStore, StorageError};

/// Stores each key in its own file under `data_dir`.
///
/// Keys are percent-encoded to build the filename, so `@Cookify:favorites`
/// lands in `%40Cookify%3Afavorites.json`. Each write goes to its own
/// uniquely named temp file in the same directory, which is then renamed
/// over the target. Readers see either the old value or a complete new one,
/// even when writes to one key overlap.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    data_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", urlencoding::encode(key)))
    }
}

fn write_replacing(dir: &Path, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    std::fs::create_dir_all(dir).map_err(|e| StorageError::Io(dir.to_path_buf(), e))?;

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| StorageError::Io(dir.to_path_buf(), e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StorageError::Io(tmp_path, e))?;

    // On failure the temp file is dropped and deleted; the target is untouched.
    tmp.persist(path)
        .map_err(|e| StorageError::Io(path.to_path_buf(), e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let dir = self.data_dir.clone();
        let path = self.path(key);
        let contents = value.as_bytes().to_vec();

        tokio::task::spawn_blocking(move || write_replacing(&dir, &path, &contents))
            .await
            .map_err(|e| StorageError::Backend(format!("write task failed: {}", e)))??;

        tracing::debug!(key, bytes = value.len(), "wrote key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (FileKeyValueStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_path_encodes_key() {
        let (storage, _temp) = test_storage();
        let path = storage.path("@Cookify:favorites");
        assert!(path.ends_with("%40Cookify%3Afavorites.json"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (storage, _temp) = test_storage();
        assert!(storage.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let storage = FileKeyValueStore::new(nested.clone());

        storage.set("k", "[]").await.unwrap();

        assert!(nested.exists());
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_set_replaces_whole_value() {
        let (storage, temp) = test_storage();

        storage.set("k", r#"["1","2","3"]"#).await.unwrap();
        storage.set("k", r#"["4"]"#).await.unwrap();

        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some(r#"["4"]"#));

        // No temp files left behind.
        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("k.json")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_sets_leave_a_complete_value() {
        let (storage, _temp) = test_storage();

        for _ in 0..50 {
            let values: Vec<Vec<String>> = (1..=8)
                .map(|n| (0..n * 40).map(|i| format!("id-{}", i)).collect())
                .collect();

            let tasks: Vec<_> = values
                .iter()
                .map(|value| {
                    let storage = storage.clone();
                    let raw = serde_json::to_string(value).unwrap();
                    tokio::spawn(async move { storage.set("k", &raw).await })
                })
                .collect();

            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let raw = storage.get("k").await.unwrap().unwrap();
            let stored: Vec<String> = serde_json::from_str(&raw).unwrap();
            assert!(values.contains(&stored));
        }
    }

    #[test]
    fn test_failed_replace_keeps_target() {
        let (storage, temp) = test_storage();
        // A non-empty directory at the target path cannot be replaced.
        let target = storage.path("k");
        std::fs::create_dir_all(target.join("inner")).unwrap();

        let err = write_replacing(temp.path(), &target, b"[]").unwrap_err();

        assert!(matches!(err, StorageError::Io(ref path, _) if path == &target));
        assert!(target.join("inner").exists());
        let leftovers = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let (storage, _temp) = test_storage();
        storage.remove("missing").await.unwrap();

        storage.set("k", "v").await.unwrap();
        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_unreadable_path_is_io_error() {
        let (storage, _temp) = test_storage();
        // A directory where the file should be cannot be read as a string.
        std::fs::create_dir_all(storage.path("k")).unwrap();

        let err = storage.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Io(..)));
    }
}
