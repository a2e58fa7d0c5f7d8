//! Filesystem blob store
//!
//! One file per blob under a sharded directory tree, written atomically.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use dataroom_core_types::FileId;

use super::sharding::shard_path;
use super::BlobStore;
use crate::atomic::atomic_write;
use crate::errors::{io_error, Result, StoreError};

const BLOB_EXTENSION: &str = "bin";

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn path_for(&self, file_id: &FileId) -> Result<PathBuf> {
        let raw = file_id.as_str();
        let safe = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(StoreError::InvalidBlobId {
                file_id: raw.to_string(),
            });
        }
        Ok(shard_path(&self.root, raw, BLOB_EXTENSION))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, file_id: &FileId, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(file_id)?;
        atomic_write(&path, bytes)?;
        tracing::debug!(file_id = %file_id, bytes = bytes.len(), "stored blob");
        Ok(())
    }

    fn get(&self, file_id: &FileId) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(file_id)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read_blob", e)),
        }
    }

    fn delete(&self, file_id: &FileId) -> Result<bool> {
        let path = self.path_for(file_id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("delete_blob", e)),
        }
    }

    fn ids(&self) -> Result<Vec<FileId>> {
        let shards = match fs::read_dir(&self.root) {
            Ok(shards) => shards,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_blob_shards", e)),
        };

        let mut ids = Vec::new();
        for shard in shards {
            let shard = shard.map_err(|e| io_error("list_blob_shards", e))?;
            if !shard.path().is_dir() {
                continue;
            }
            for entry in fs::read_dir(shard.path()).map_err(|e| io_error("list_blobs", e))? {
                let path = entry.map_err(|e| io_error("list_blobs", e))?.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some(BLOB_EXTENSION) {
                    continue;
                }
                if let Some(id) = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| FileId::try_new(stem).ok())
                {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (FsBlobStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (FsBlobStore::new(dir.path()), dir)
    }

    fn id(value: &str) -> FileId {
        FileId::try_new(value).unwrap()
    }

    #[test]
    fn test_put_get_roundtrip() {
        let (store, _dir) = setup();
        store.put(&id("abc123"), b"%PDF-1.7").unwrap();
        assert_eq!(store.get(&id("abc123")).unwrap(), Some(b"%PDF-1.7".to_vec()));
        assert!(store.root().join("ab").join("abc123.bin").exists());
    }

    #[test]
    fn test_get_missing_is_none() {
        let (store, _dir) = setup();
        assert_eq!(store.get(&id("missing")).unwrap(), None);
        assert!(!store.delete(&id("missing")).unwrap());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (store, _dir) = setup();
        let result = store.put(&id("../escape"), b"x");
        assert!(matches!(result, Err(StoreError::InvalidBlobId { .. })));
    }

    #[test]
    fn test_ids_lists_stored_blobs() {
        let (store, _dir) = setup();
        store.put(&id("b-2"), b"2").unwrap();
        store.put(&id("a-1"), b"1").unwrap();
        assert_eq!(store.ids().unwrap(), vec![id("a-1"), id("b-2")]);
    }
}
